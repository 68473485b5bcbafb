use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub fill: FillConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Allowed CORS origins; empty allows any
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// Request body limit for uploads
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FillConfig {
    /// Filename offered in Content-Disposition
    #[serde(default = "default_output_filename")]
    pub output_filename: String,
    /// Font size of rebuilt tables, in points
    #[serde(default = "default_table_font_size_pt")]
    pub table_font_size_pt: u32,
    /// Shape name (and mapping key) of the table extended in place
    #[serde(default = "default_quality_table")]
    pub quality_table: String,
    /// Width of columns added to that table, in EMU
    #[serde(default = "default_added_column_width_emu")]
    pub added_column_width_emu: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogConfig {
    #[serde(default)]
    pub format: LogFormat,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_max_upload_bytes() -> usize {
    50 * 1024 * 1024 // 50 MiB
}

fn default_output_filename() -> String {
    "filled.pptx".to_string()
}

fn default_table_font_size_pt() -> u32 {
    12
}

fn default_quality_table() -> String {
    "quality".to_string()
}

fn default_added_column_width_emu() -> i64 {
    1_371_600 // 1.5 in
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        // Load .env file if exists
        let _ = dotenvy::dotenv();

        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Config::builder()
            // Start with default values
            .set_default("server.host", default_host())?
            .set_default("server.port", i64::from(default_port()))?
            .set_default("server.max_upload_bytes", default_max_upload_bytes() as i64)?
            .set_default("fill.output_filename", default_output_filename())?
            .set_default("fill.table_font_size_pt", i64::from(default_table_font_size_pt()))?
            .set_default("fill.quality_table", default_quality_table())?
            .set_default("fill.added_column_width_emu", default_added_column_width_emu())?
            .set_default("log.format", "text")?
            // Load config file if exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Load from environment variables
            // FILLER_SERVER__PORT, FILLER_FILL__QUALITY_TABLE, FILLER_LOG__FORMAT, etc.
            .add_source(
                Environment::with_prefix("FILLER")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("server.cors_origins"),
            );

        builder.build()?.try_deserialize()
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: vec![],
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl Default for FillConfig {
    fn default() -> Self {
        Self {
            output_filename: default_output_filename(),
            table_font_size_pt: default_table_font_size_pt(),
            quality_table: default_quality_table(),
            added_column_width_emu: default_added_column_width_emu(),
        }
    }
}
