use clap::Parser;
use std::num::NonZeroUsize;
use std::path::PathBuf;

use crate::config::VerifyConfig;
use crate::error::Result;
use crate::writer::hexdump::DEFAULT_WIDTH;

#[derive(Parser, Debug)]
#[command(author, version, about = "Check exported screen binaries against their Tiled map")]
pub struct Cli {
    /// JSON file providing `mapFile`, `binPattern` and `strictNames`
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Tiled .tmx map
    #[arg(long = "map")]
    pub map_file: Option<PathBuf>,
    /// Glob matching the exported screen files
    #[arg(long = "bins")]
    pub bin_pattern: Option<String>,
    /// Count files without a screen index as failures
    #[arg(long)]
    pub strict_names: bool,
    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
    /// Debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Defaults, overlaid by `--config`, overlaid by explicit flags.
    pub fn resolve_config(&self) -> Result<VerifyConfig> {
        let mut config = match &self.config {
            Some(path) => VerifyConfig::load(path)?,
            None => VerifyConfig::default(),
        };
        if let Some(map) = &self.map_file {
            config.map_file = map.clone();
        }
        if let Some(pattern) = &self.bin_pattern {
            config.bin_pattern = pattern.clone();
        }
        config.strict_names |= self.strict_names;
        Ok(config)
    }
}

#[derive(Parser, Debug)]
#[command(name = "read_bin", about = "Print a screen file as rows of decimal tile ids")]
pub struct DumpCli {
    /// Binary file to dump
    pub filename: PathBuf,
    /// Bytes per row
    #[arg(default_value_t = DEFAULT_WIDTH)]
    pub width: NonZeroUsize,
}
