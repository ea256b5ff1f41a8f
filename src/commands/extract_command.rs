//! Extraction under vector geometries

use clap::ArgMatches;
use log::info;

use crate::api::RasterSample;
use crate::commands::command_traits::Command;
use crate::commands::{input_rasters, required, resolve_settings};
use crate::config::OutputFormat;
use crate::error::SampleResult;
use crate::extractor::ExtractOptions;
use crate::utils::logger::Logger;

/// Command sampling a raster stack under the geometries of a GeoJSON file
pub struct ExtractCommand<'a> {
    /// Paths of the stacked rasters
    rasters: Vec<String>,
    /// Path of the GeoJSON file
    vector: String,
    /// Path of the output table
    output: String,
    format: OutputFormat,
    options: ExtractOptions,
    /// Logger for recording operations
    logger: &'a Logger,
}

impl<'a> ExtractCommand<'a> {
    /// Create a new extract command
    ///
    /// # Arguments
    /// * `args` - CLI argument matches from clap
    /// * `logger` - Logger for recording operations
    ///
    /// # Returns
    /// A new ExtractCommand instance or an error
    pub fn new(args: &ArgMatches, logger: &'a Logger) -> SampleResult<Self> {
        let rasters = input_rasters(args)?;
        let vector = required(args, "vector")?;
        let output = required(args, "output")?;
        let (options, format) = resolve_settings(args, &output)?;

        Ok(ExtractCommand {
            rasters,
            vector,
            output,
            format,
            options,
            logger,
        })
    }
}

impl<'a> Command for ExtractCommand<'a> {
    fn execute(&self) -> SampleResult<()> {
        info!("Sampling {} raster(s) under {}", self.rasters.len(), self.vector);

        let api = RasterSample::new(self.options);
        let (result, geometries) = api.extract(&self.rasters, &self.vector)?;

        let table = result.into_table();
        api.write_table(&table, &self.output, self.format)?;

        let summary = format!(
            "extract: {} geometries, {} rows, {} warnings -> {}",
            geometries.len(), table.len(), table.warnings.len(), self.output);
        self.logger.write_line(&summary)?;
        println!("{}", summary);
        Ok(())
    }
}
