//! Extraction under a labelled raster

use clap::ArgMatches;
use log::info;

use crate::api::RasterSample;
use crate::commands::command_traits::Command;
use crate::commands::{input_rasters, required, resolve_settings};
use crate::config::OutputFormat;
use crate::error::SampleResult;
use crate::extractor::ExtractOptions;
use crate::utils::logger::Logger;

/// Command sampling a raster stack under every labelled pixel
pub struct LabelsCommand<'a> {
    rasters: Vec<String>,
    /// Path of the label GeoTIFF
    labels: String,
    output: String,
    format: OutputFormat,
    options: ExtractOptions,
    logger: &'a Logger,
}

impl<'a> LabelsCommand<'a> {
    pub fn new(args: &ArgMatches, logger: &'a Logger) -> SampleResult<Self> {
        let rasters = input_rasters(args)?;
        let labels = required(args, "labels")?;
        let output = required(args, "output")?;
        let (options, format) = resolve_settings(args, &output)?;

        Ok(LabelsCommand {
            rasters,
            labels,
            output,
            format,
            options,
            logger,
        })
    }
}

impl<'a> Command for LabelsCommand<'a> {
    fn execute(&self) -> SampleResult<()> {
        info!("Sampling {} raster(s) under labels {}", self.rasters.len(), self.labels);

        let api = RasterSample::new(self.options);
        let table = api.extract_labels(&self.rasters, &self.labels)?;
        api.write_labelled(&table, &self.output, self.format)?;

        let summary = format!("labels: {} labelled pixels -> {}", table.len(), self.output);
        self.logger.write_line(&summary)?;
        println!("{}", summary);
        Ok(())
    }
}
