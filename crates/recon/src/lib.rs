//! `mushaf-recon`: verse-keyed dataset reconciliation.
//!
//! Pure engine crate: receives already-normalized datasets, returns coverage
//! reports, translation ranges, and merged datasets. No CLI or IO
//! dependencies.

pub mod clean;
pub mod config;
pub mod coverage;
pub mod error;
pub mod index;
pub mod key;
pub mod merge;
pub mod model;
pub mod quality;
pub mod ranges;
pub mod similar;

pub use clean::{OcrCleaner, TextCleaner};
pub use config::{CleanerConfig, MergeConfig};
pub use error::ReconError;
pub use key::{DatasetKey, RawKey, VerseKey};
pub use model::{CoverageReport, Entry, MergeOutcome, SourceDataset, TranslationRange};
