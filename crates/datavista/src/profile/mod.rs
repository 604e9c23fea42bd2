//! Column statistics for loaded tables.

mod statistics;

pub use statistics::{ColumnProfile, Profile, ProfileConfig, Profiler};
