//! PDF summary report of a profile.

mod composer;
mod fonts;
mod pdf;

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::profile::Profile;

pub use composer::{ComposerState, ReportComposer, ReportConfig};

/// A finished report, ready to hand to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDocument {
    bytes: Vec<u8>,
    pages: usize,
}

impl ReportDocument {
    /// Suggested download name.
    pub const FILE_NAME: &'static str = "DataVista_Report.pdf";
    /// MIME type of the bytes.
    pub const MIME_TYPE: &'static str = "application/pdf";

    pub(crate) fn new(bytes: Vec<u8>, pages: usize) -> Self {
        Self { bytes, pages }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn page_count(&self) -> usize {
        self.pages
    }

    pub fn file_name(&self) -> &'static str {
        Self::FILE_NAME
    }

    pub fn mime_type(&self) -> &'static str {
        Self::MIME_TYPE
    }
}

/// Render a profile with the default layout.
pub fn render(
    profile: &Profile,
    row_count: usize,
    column_count: usize,
    generated_at: DateTime<Utc>,
) -> Result<ReportDocument> {
    ReportComposer::render(
        ReportConfig::default(),
        profile,
        row_count,
        column_count,
        generated_at,
    )
}
