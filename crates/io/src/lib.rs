//! `mushaf-io`: reading source documents into canonical datasets and
//! writing report artifacts.

pub mod cache;
pub mod error;
pub mod load;
pub mod shape;
pub mod write;

pub use cache::DocumentCache;
pub use error::IoError;
pub use load::{load_source, load_source_cached, read_json, read_text_file, SourceSpec};
pub use shape::{RawDataset, ShapeHint};
pub use write::{write_json_atomic, write_text_atomic};
