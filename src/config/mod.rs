#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::domain::model::{FormFactor, QueryType};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use toml_config::TomlConfig;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "crux-vitals")]
#[command(version)]
#[command(about = "Check Core Web Vitals for up to four domains using the Chrome UX Report API")]
pub struct CliConfig {
    /// Domains or URLs to compare (at most four)
    pub domains: Vec<String>,

    /// Query scope: origin or url
    #[arg(long)]
    pub query_type: Option<QueryType>,

    /// Device form factor: desktop or phone
    #[arg(long)]
    pub form_factor: Option<FormFactor>,

    #[arg(long, env = "CRUX_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(long, help = "Override the queryRecord endpoint")]
    pub endpoint: Option<String>,

    #[arg(long)]
    pub output_path: Option<String>,

    /// Comma separated list of console, json, csv
    #[arg(long, value_delimiter = ',')]
    pub formats: Vec<String>,

    #[arg(long, help = "Bundle file outputs into a single ZIP")]
    pub archive: bool,

    #[arg(long, help = "Print the raw API response under each domain")]
    pub show_raw: bool,

    #[arg(long, help = "Print the API metrics summary view")]
    pub summary: bool,

    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 命令列參數覆蓋設定檔
    pub fn apply_overrides(&self, config: &mut TomlConfig) {
        if !self.domains.is_empty() {
            config.query.domains = self.domains.clone();
        }
        if let Some(query_type) = self.query_type {
            config.query.query_type = query_type;
        }
        if let Some(form_factor) = self.form_factor {
            config.query.form_factor = form_factor;
        }
        if let Some(api_key) = &self.api_key {
            config.api.api_key = Some(api_key.clone());
        }
        if let Some(endpoint) = &self.endpoint {
            config.api.endpoint = endpoint.clone();
        }
        if let Some(timeout) = self.timeout_secs {
            config.api.timeout_seconds = Some(timeout);
        }
        if let Some(path) = &self.output_path {
            config.output.path = path.clone();
        }
        if !self.formats.is_empty() {
            config.output.formats = self
                .formats
                .iter()
                .map(|f| f.trim().to_ascii_lowercase())
                .collect();
        }
        config.output.archive |= self.archive;
        config.output.show_raw |= self.show_raw;
        config.output.summary |= self.summary;
    }
}
