//! CLI command implementations
//!
//! This module contains implementations of various commands
//! supported by the CLI application using the Command pattern.

pub mod cli;
pub mod command_traits;
pub mod extract_command;
pub mod labels_command;
pub mod info_command;

pub use cli::build_cli;
pub use command_traits::{Command, CommandFactory};
pub use extract_command::ExtractCommand;
pub use labels_command::LabelsCommand;
pub use info_command::InfoCommand;

use clap::ArgMatches;
use log::debug;
use std::path::Path;

use crate::config::{ExtractConfig, OutputFormat};
use crate::error::{SampleError, SampleResult};
use crate::extractor::{ExtractOptions, OutputMode};
use crate::utils::logger::Logger;

/// Factory for creating command instances based on CLI arguments
///
/// `--vector` selects extraction under geometries, `--labels` extraction
/// under a label raster; without either the rasters are described.
#[derive(Default)]
pub struct RasterSampleCommandFactory;

impl RasterSampleCommandFactory {
    /// Create a new factory instance
    pub fn new() -> Self {
        RasterSampleCommandFactory
    }
}

impl<'a> CommandFactory<'a> for RasterSampleCommandFactory {
    fn create_command(&self, args: &ArgMatches, logger: &'a Logger) -> SampleResult<Box<dyn Command + 'a>> {
        if args.contains_id("vector") && args.contains_id("labels") {
            return Err(SampleError::Config("--vector and --labels cannot be combined".to_string()));
        }

        if args.contains_id("vector") {
            Ok(Box::new(ExtractCommand::new(args, logger)?))
        } else if args.contains_id("labels") {
            Ok(Box::new(LabelsCommand::new(args, logger)?))
        } else {
            Ok(Box::new(InfoCommand::new(args, logger)?))
        }
    }
}

/// Raster paths given on the command line
pub(crate) fn input_rasters(args: &ArgMatches) -> SampleResult<Vec<String>> {
    let rasters: Vec<String> = args
        .get_many::<String>("input")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    if rasters.is_empty() {
        return Err(SampleError::Config("Missing input raster".to_string()));
    }
    Ok(rasters)
}

/// Required string argument
pub(crate) fn required(args: &ArgMatches, name: &str) -> SampleResult<String> {
    args.get_one::<String>(name)
        .cloned()
        .ok_or_else(|| SampleError::Config(format!("Missing --{}", name)))
}

/// Extraction options and output format from the config file and CLI flags
///
/// Flags override the file. The format falls back to the output extension,
/// then to CSV.
pub(crate) fn resolve_settings(args: &ArgMatches, output: &str) -> SampleResult<(ExtractOptions, OutputFormat)> {
    let config = match args.get_one::<String>("config") {
        Some(path) => ExtractConfig::load(path)?,
        None => ExtractConfig::default(),
    };

    let mut options = config.extract_options();
    if args.get_flag("array") {
        options = options.with_mode(OutputMode::Arrays);
    }
    if args.get_flag("strict") {
        options = options.with_strict(true);
    }
    if let Some(block_rows) = args.get_one::<usize>("block-rows") {
        options = options.with_block_rows(*block_rows);
    }
    options = options.with_progress(args.get_flag("progress"));

    let format = match args.get_one::<String>("format") {
        Some(name) => name.parse().map_err(SampleError::Config)?,
        None => config
            .output
            .format
            .or_else(|| OutputFormat::from_path(Path::new(output)))
            .unwrap_or_default(),
    };

    debug!("Resolved options {:?}, format {}", options, format);
    Ok((options, format))
}
