pub mod settings;

pub use settings::{AppConfig, CaptureConfig, DataConfig, EngineConfig};
