//! Command-line interface components.

use crate::config::{ColorScaleKind, ExplorerConfig};
use crate::constants::DATASET_ENV_VAR;
use crate::error::{ExplorerError, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "lostfound-explorer")]
#[command(about = "Explore railway lost-and-found records by station")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// Path to the lost-and-found export
    #[arg(short, long, global = true, env = DATASET_ENV_VAR, value_name = "PATH")]
    pub dataset: Option<PathBuf>,

    /// Field separator (a single ASCII character)
    #[arg(long, global = true, default_value = ",")]
    pub separator: char,

    /// Abort on the first malformed field instead of counting it
    #[arg(long, global = true)]
    pub strict: bool,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Map color scale (viridis, plasma, reds)
    #[arg(long, global = true, default_value = "viridis")]
    pub color_scale: String,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Statistics and map over the whole dataset
    Summary,

    /// Statistics and map for a single station
    Select {
        /// Exact, case-sensitive station name
        station: String,
    },

    /// Stations ranked by record count
    Stations {
        /// Only show the first N stations
        #[arg(long)]
        top: Option<usize>,
    },

    /// Read JSON selection events from stdin and write view updates to stdout
    Session,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable colored output
    Table,
    /// One JSON document per result
    Json,
}

impl Args {
    /// Log level implied by the verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "warn"
        } else {
            "info"
        }
    }

    /// Build the configuration from arguments
    pub fn to_config(&self) -> Result<ExplorerConfig> {
        let dataset = self.dataset.clone().ok_or_else(|| {
            ExplorerError::configuration(format!(
                "No dataset given; pass --dataset or set {}",
                DATASET_ENV_VAR
            ))
        })?;

        if !self.separator.is_ascii() {
            return Err(ExplorerError::configuration(format!(
                "Separator must be ASCII, got {:?}",
                self.separator
            )));
        }

        let color_scale: ColorScaleKind = self.color_scale.parse()?;

        let mut config = ExplorerConfig::for_dataset(dataset)
            .with_separator(self.separator as u8)
            .with_color_scale(color_scale);
        if self.strict {
            config = config.with_strict_fields();
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_select_command() {
        let args = Args::try_parse_from([
            "lostfound-explorer",
            "--dataset",
            "/data/objets.csv",
            "select",
            "Paris Montparnasse",
        ])
        .unwrap();

        assert_eq!(
            args.command,
            Some(Command::Select {
                station: "Paris Montparnasse".to_string()
            })
        );
        assert_eq!(args.dataset, Some(PathBuf::from("/data/objets.csv")));
        assert_eq!(args.format, OutputFormat::Table);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = Args::try_parse_from([
            "lostfound-explorer",
            "stations",
            "--top",
            "5",
            "--format",
            "json",
            "--separator",
            ";",
            "--dataset",
            "objets.csv",
        ])
        .unwrap();

        assert_eq!(args.command, Some(Command::Stations { top: Some(5) }));
        assert_eq!(args.format, OutputFormat::Json);

        let config = args.to_config().unwrap();
        assert_eq!(config.dataset.separator, b';');
    }

    #[test]
    fn test_log_levels() {
        let args =
            Args::try_parse_from(["lostfound-explorer", "-v", "--dataset", "x.csv", "summary"])
                .unwrap();
        assert_eq!(args.get_log_level(), "debug");

        assert!(Args::try_parse_from(["lostfound-explorer", "-v", "-q", "summary"]).is_err());
    }

    #[test]
    fn test_unknown_color_scale_rejected() {
        let args = Args::try_parse_from([
            "lostfound-explorer",
            "--dataset",
            "x.csv",
            "--color-scale",
            "rainbow",
            "summary",
        ])
        .unwrap();
        assert!(args.to_config().is_err());
    }

    #[test]
    fn test_strict_flag_reaches_config() {
        let args =
            Args::try_parse_from(["lostfound-explorer", "--dataset", "x.csv", "--strict", "summary"])
                .unwrap();
        assert!(args.to_config().unwrap().dataset.strict_fields);
    }
}
