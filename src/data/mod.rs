pub mod source;

pub use source::{normalize, ProgressExport, RecordSource};
