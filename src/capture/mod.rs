pub mod canvas;
pub mod font;
pub mod share;

pub use share::{share_snapshot, CaptureError, FileSink, ShareOutcome, ShareTarget, IMAGE_MIME};
