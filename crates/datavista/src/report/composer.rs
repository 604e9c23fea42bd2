//! Summary report layout.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ReportError, Result};
use crate::profile::{ColumnProfile, Profile};

use super::ReportDocument;
use super::fonts::Font;
use super::pdf::{Align, DocumentInfo, MARGIN, PAGE_HEIGHT, PAGE_WIDTH, PdfWriter};

/// Layout settings. Column widths are fixed; cell text is not wrapped or
/// truncated to fit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Title in the page header band.
    pub title: String,
    /// Attribution line under the title.
    pub attribution: String,
    /// Grid column widths in millimetres, one per profile field.
    pub column_widths: [f64; 6],
    /// Height of the bold heading row.
    pub header_row_height: f64,
    /// Height of each profile row.
    pub body_row_height: f64,
    /// Distance from the bottom edge at which a new page is started.
    pub page_break_margin: f64,
    /// Body text size in points.
    pub font_size: f64,
    /// Title size in points.
    pub title_font_size: f64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: "Data Vista".to_string(),
            attribution: "Developed by: Mikkili Avinash".to_string(),
            column_widths: [40.0, 30.0, 30.0, 30.0, 30.0, 30.0],
            header_row_height: 7.0,
            body_row_height: 6.0,
            page_break_margin: 5.0,
            font_size: 10.0,
            title_font_size: 20.0,
        }
    }
}

impl ReportConfig {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_attribution(mut self, attribution: impl Into<String>) -> Self {
        self.attribution = attribution.into();
        self
    }
}

/// Where a composer is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposerState {
    /// First page opened, nothing of the body written.
    Initialized,
    /// Summary lines and grid headings written.
    HeaderWritten,
    /// This many profile rows written after the headings.
    BodyRowsWritten(usize),
    /// Document serialized; no further writes.
    Finalized,
}

const TITLE_HEIGHT: f64 = 8.0;
const BAND_LINE_HEIGHT: f64 = 5.0;
const TITLE_WIDTH: f64 = 190.0;
const ATTRIBUTION_WIDTH: f64 = 180.0;
const DATE_WIDTH: f64 = 10.0;
const FOOTER_OFFSET: f64 = 15.0;
const FOOTER_HEIGHT: f64 = 10.0;
const SUMMARY_WIDTH: f64 = 10.0;

/// Writes a profile as a paginated, bordered grid.
///
/// Every page gets the title band and a `Page No-N` footer; pages are added
/// automatically when the next line would cross the break margin.
pub struct ReportComposer {
    config: ReportConfig,
    generated_at: DateTime<Utc>,
    writer: PdfWriter,
    state: ComposerState,
}

impl ReportComposer {
    /// Open the first page. `generated_at` is the only time source used.
    pub fn new(config: ReportConfig, generated_at: DateTime<Utc>) -> Self {
        let mut composer = Self {
            config,
            generated_at,
            writer: PdfWriter::new(),
            state: ComposerState::Initialized,
        };
        composer.open_page();
        composer
    }

    /// Render a whole profile in one call.
    pub fn render(
        config: ReportConfig,
        profile: &Profile,
        row_count: usize,
        column_count: usize,
        generated_at: DateTime<Utc>,
    ) -> Result<ReportDocument> {
        let mut composer = Self::new(config, generated_at);
        composer.write_header(row_count, column_count)?;
        for column in &profile.columns {
            composer.write_row(column)?;
        }
        composer.finalize()
    }

    pub fn state(&self) -> ComposerState {
        self.state
    }

    /// Write the separator rule, row/column counts and grid headings.
    pub fn write_header(&mut self, row_count: usize, column_count: usize) -> Result<()> {
        match self.state {
            ComposerState::Initialized => {}
            ComposerState::Finalized => return Err(ReportError::Finalized.into()),
            _ => return Err(ReportError::HeaderAlreadyWritten.into()),
        }

        let rule_y = MARGIN + TITLE_HEIGHT + BAND_LINE_HEIGHT;
        self.writer.line(MARGIN, rule_y, PAGE_WIDTH - MARGIN, rule_y);

        self.writer.set_font(Font::Regular, self.config.font_size);
        for line in [
            format!("Number of Rows: {}", row_count),
            format!("Number of Columns: {}", column_count),
            " ".to_string(),
        ] {
            self.ensure_room(BAND_LINE_HEIGHT);
            self.writer
                .cell(SUMMARY_WIDTH, BAND_LINE_HEIGHT, &line, false, Align::Left, true);
        }

        let height = self.config.header_row_height;
        self.ensure_room(height);
        self.writer.set_font(Font::Bold, self.config.font_size);
        for (width, heading) in self.config.column_widths.iter().zip(ColumnProfile::HEADERS) {
            self.writer
                .cell(*width, height, heading, true, Align::Center, false);
        }
        self.writer.ln(height);
        self.writer.set_font(Font::Regular, self.config.font_size);

        self.state = ComposerState::HeaderWritten;
        Ok(())
    }

    /// Write one profile row: name left-aligned, the rest centred.
    pub fn write_row(&mut self, column: &ColumnProfile) -> Result<()> {
        let written = match self.state {
            ComposerState::HeaderWritten => 0,
            ComposerState::BodyRowsWritten(n) => n,
            ComposerState::Initialized => return Err(ReportError::HeaderNotWritten.into()),
            ComposerState::Finalized => return Err(ReportError::Finalized.into()),
        };

        let height = self.config.body_row_height;
        self.ensure_room(height);
        self.writer.set_font(Font::Regular, self.config.font_size);

        let widths = self.config.column_widths;
        for (i, (width, text)) in widths.iter().zip(column.cells()).enumerate() {
            let align = if i == 0 { Align::Left } else { Align::Center };
            self.writer.cell(*width, height, &text, true, align, false);
        }
        self.writer.ln(height);

        self.state = ComposerState::BodyRowsWritten(written + 1);
        Ok(())
    }

    /// Close the last page and serialize the document.
    pub fn finalize(&mut self) -> Result<ReportDocument> {
        match self.state {
            ComposerState::HeaderWritten | ComposerState::BodyRowsWritten(_) => {}
            ComposerState::Initialized => return Err(ReportError::HeaderNotWritten.into()),
            ComposerState::Finalized => return Err(ReportError::Finalized.into()),
        }

        self.write_footer();
        self.state = ComposerState::Finalized;

        let writer = std::mem::take(&mut self.writer);
        let pages = writer.page_count();
        let bytes = writer.finish(&DocumentInfo {
            title: self.config.title.clone(),
            producer: "DataVista".to_string(),
            created_at: self.generated_at,
        })?;

        tracing::info!(pages, bytes = bytes.len(), "Rendered report");

        Ok(ReportDocument::new(bytes, pages))
    }

    /// Start a new page if a line of height `h` would cross the break margin.
    ///
    /// The footer is placed `FOOTER_OFFSET` from the bottom regardless, so with
    /// the default 5 mm margin the last body rows of a full page overlap it.
    fn ensure_room(&mut self, h: f64) {
        let trigger = PAGE_HEIGHT - self.config.page_break_margin;
        if self.writer.y() + h > trigger {
            self.write_footer();
            self.open_page();
        }
    }

    fn open_page(&mut self) {
        self.writer.add_page();

        self.writer.set_font(Font::Regular, self.config.title_font_size);
        self.writer
            .cell(TITLE_WIDTH, TITLE_HEIGHT, &self.config.title, false, Align::Left, true);

        self.writer.set_font(Font::Regular, self.config.font_size);
        self.writer.cell(
            ATTRIBUTION_WIDTH,
            BAND_LINE_HEIGHT,
            &self.config.attribution,
            false,
            Align::Left,
            false,
        );
        let date = format!("Date: {}", self.generated_at.format("%Y-%m-%d"));
        self.writer
            .cell(DATE_WIDTH, BAND_LINE_HEIGHT, &date, false, Align::Right, true);
    }

    fn write_footer(&mut self) {
        let page = self.writer.page_count();
        self.writer.set_y(PAGE_HEIGHT - FOOTER_OFFSET);
        self.writer.set_font(Font::Regular, self.config.font_size);
        self.writer.cell(
            0.0,
            FOOTER_HEIGHT,
            &format!("Page No-{}", page),
            false,
            Align::Left,
            false,
        );
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::error::DataVistaError;
    use crate::report::pdf::page_texts;
    use crate::schema::DataType;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 9, 30, 0).unwrap()
    }

    fn column(name: &str) -> ColumnProfile {
        ColumnProfile {
            name: name.to_string(),
            unique_count: 3,
            total_count: 4,
            duplicate_count: 1,
            null_count: 0,
            data_type: DataType::Integer,
        }
    }

    fn profile(columns: usize) -> Profile {
        Profile {
            columns: (0..columns).map(|i| column(&format!("col_{}", i))).collect(),
            row_count: 4,
            column_count: columns,
        }
    }

    fn texts(doc: &ReportDocument) -> Vec<Vec<String>> {
        page_texts(doc.bytes())
    }

    #[test]
    fn test_state_transitions() {
        let mut composer = ReportComposer::new(ReportConfig::default(), fixed_time());
        assert_eq!(composer.state(), ComposerState::Initialized);

        composer.write_header(4, 1).unwrap();
        assert_eq!(composer.state(), ComposerState::HeaderWritten);

        composer.write_row(&column("a")).unwrap();
        composer.write_row(&column("b")).unwrap();
        assert_eq!(composer.state(), ComposerState::BodyRowsWritten(2));

        composer.finalize().unwrap();
        assert_eq!(composer.state(), ComposerState::Finalized);
    }

    #[test]
    fn test_row_before_header_rejected() {
        let mut composer = ReportComposer::new(ReportConfig::default(), fixed_time());
        let err = composer.write_row(&column("a")).unwrap_err();
        assert!(matches!(
            err,
            DataVistaError::Report(ReportError::HeaderNotWritten)
        ));
        assert!(composer.finalize().is_err());
    }

    #[test]
    fn test_header_twice_rejected() {
        let mut composer = ReportComposer::new(ReportConfig::default(), fixed_time());
        composer.write_header(1, 1).unwrap();
        let err = composer.write_header(1, 1).unwrap_err();
        assert!(matches!(
            err,
            DataVistaError::Report(ReportError::HeaderAlreadyWritten)
        ));
    }

    #[test]
    fn test_no_writes_after_finalize() {
        let mut composer = ReportComposer::new(ReportConfig::default(), fixed_time());
        composer.write_header(1, 1).unwrap();
        composer.finalize().unwrap();

        for result in [
            composer.write_row(&column("a")),
            composer.write_header(1, 1),
            composer.finalize().map(|_| ()),
        ] {
            assert!(matches!(
                result,
                Err(DataVistaError::Report(ReportError::Finalized))
            ));
        }
    }

    #[test]
    fn test_content() {
        let doc =
            ReportComposer::render(ReportConfig::default(), &profile(2), 100, 5, fixed_time())
                .unwrap();
        let pages = texts(&doc);
        assert_eq!(pages.len(), 1);
        let page = &pages[0];

        assert_eq!(
            &page[..5],
            &[
                "Data Vista",
                "Developed by: Mikkili Avinash",
                "Date: 2024-03-15",
                "Number of Rows: 100",
                "Number of Columns: 5",
            ]
        );
        for heading in ColumnProfile::HEADERS {
            assert!(page.iter().any(|t| t == heading));
        }
        assert!(page.iter().any(|t| t == "col_1"));
        assert_eq!(page.last().map(String::as_str), Some("Page No-1"));
    }

    #[test]
    fn test_paginates_long_profiles() {
        let doc =
            ReportComposer::render(ReportConfig::default(), &profile(120), 4, 120, fixed_time())
                .unwrap();
        let pages = texts(&doc);

        assert!(doc.page_count() >= 3);
        assert_eq!(pages.len(), doc.page_count());
        for (i, page) in pages.iter().enumerate() {
            // Title band first, footer last, on every page.
            assert_eq!(page[0], "Data Vista");
            assert_eq!(page.last().unwrap(), &format!("Page No-{}", i + 1));
        }
        // Summary lines only on the first page.
        assert!(pages[0].iter().any(|t| t == "Number of Rows: 4"));
        assert!(!pages[1].iter().any(|t| t.starts_with("Number of")));
    }

    #[test]
    fn test_last_rows_reach_into_footer_band() {
        // Rows run down to the break margin, so the last rows of a full page
        // sit inside the footer band.
        let mut composer = ReportComposer::new(ReportConfig::default(), fixed_time());
        composer.write_header(1, 1).unwrap();

        let mut lowest = 0.0;
        loop {
            composer.write_row(&column("x")).unwrap();
            if composer.writer.page_count() > 1 {
                break;
            }
            lowest = composer.writer.y();
        }

        let footer_top = PAGE_HEIGHT - FOOTER_OFFSET;
        assert!(lowest > footer_top);
        assert!(lowest <= PAGE_HEIGHT - composer.config.page_break_margin);
    }

    #[test]
    fn test_deterministic() {
        let first =
            ReportComposer::render(ReportConfig::default(), &profile(3), 100, 5, fixed_time())
                .unwrap();
        let second =
            ReportComposer::render(ReportConfig::default(), &profile(3), 100, 5, fixed_time())
                .unwrap();
        assert_eq!(first.bytes(), second.bytes());
    }
}
