mod settings;

pub use settings::{FillConfig, LogConfig, LogFormat, ServerConfig, Settings};
