//! Raster description command

use clap::ArgMatches;
use log::debug;

use crate::api::RasterSample;
use crate::commands::command_traits::Command;
use crate::commands::input_rasters;
use crate::error::SampleResult;
use crate::raster::RasterStack;
use crate::utils::logger::Logger;

/// Command printing the grid and bands of each input raster
pub struct InfoCommand<'a> {
    rasters: Vec<String>,
    verbose: bool,
    logger: &'a Logger,
}

impl<'a> InfoCommand<'a> {
    pub fn new(args: &ArgMatches, logger: &'a Logger) -> SampleResult<Self> {
        Ok(InfoCommand {
            rasters: input_rasters(args)?,
            verbose: args.get_flag("verbose"),
            logger,
        })
    }
}

impl<'a> Command for InfoCommand<'a> {
    fn execute(&self) -> SampleResult<()> {
        let api = RasterSample::default();
        for raster in &self.rasters {
            let description = api.describe(raster)?;
            self.logger.write_line(&description)?;
            print!("{}", description);
        }

        // Several rasters are also checked as a stack
        if self.rasters.len() > 1 {
            let stack = RasterStack::open(&self.rasters)?;
            println!("Stack: {} bands on {}", stack.band_count(), stack.grid());
            if self.verbose {
                for name in stack.band_names() {
                    println!("  {}", name);
                }
            }
        }

        debug!("Described {} raster(s)", self.rasters.len());
        Ok(())
    }
}
