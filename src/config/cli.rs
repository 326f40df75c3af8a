use crate::config::toml_config::{HeaderConfig, MonitoringConfig, TomlConfig};
use crate::core::TargetEntity;
use crate::utils::error::Result;
use crate::utils::validation::{validate_file_extension, validate_path, Validate};
use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "asmtrack-ingest")]
#[command(about = "Bulk-load assembly, product and test-document reference tables from CSV exports")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Directory holding the JSON collections (overrides the config file)
    #[arg(long)]
    pub store_dir: Option<String>,

    /// How many leading lines to search for the header row
    #[arg(long)]
    pub scan_lines: Option<usize>,

    /// Keyword hits a line needs to count as the header row
    #[arg(long)]
    pub min_keyword_matches: Option<usize>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log per-stage timings and memory usage")]
    pub monitor: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Replace a collection with the contents of a CSV file
    Import {
        #[arg(short, long, value_parser = parse_entity)]
        entity: TargetEntity,

        /// CSV file to load
        file: String,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write a collection as CSV
    Export {
        #[arg(short, long, value_parser = parse_entity)]
        entity: TargetEntity,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Show how many records each collection holds
    Count,
}

fn parse_entity(value: &str) -> std::result::Result<TargetEntity, String> {
    value.parse::<TargetEntity>().map_err(|e| e.to_string())
}

impl CliConfig {
    /// Loads the TOML file if one was given and applies command-line overrides.
    pub fn resolve(&self) -> Result<TomlConfig> {
        let mut config = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };

        // 應用命令列覆蓋設定
        if let Some(store_dir) = &self.store_dir {
            config.store.path = store_dir.clone();
        }
        if self.scan_lines.is_some() || self.min_keyword_matches.is_some() {
            let header = config.header.get_or_insert_with(HeaderConfig::default);
            if self.scan_lines.is_some() {
                header.scan_lines = self.scan_lines;
            }
            if self.min_keyword_matches.is_some() {
                header.min_keyword_matches = self.min_keyword_matches;
            }
        }
        if self.monitor || self.json_logs {
            let monitoring = config
                .monitoring
                .get_or_insert_with(MonitoringConfig::default);
            monitoring.enabled |= self.monitor;
            if self.json_logs {
                monitoring.json_logs = Some(true);
            }
        }

        Ok(config)
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if let Some(path) = &self.config {
            validate_file_extension("config", path, &["toml"])?;
        }
        if let Some(store_dir) = &self.store_dir {
            validate_path("store_dir", store_dir)?;
        }
        if let Command::Import { file, .. } = &self.command {
            validate_path("file", file)?;
            validate_file_extension("file", file, &["csv", "txt"])?;
        }
        Ok(())
    }
}
