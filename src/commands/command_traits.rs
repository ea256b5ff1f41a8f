//! Command pattern interfaces for the CLI
//!
//! Each CLI mode (extract, labels, info) is a `Command` built by a
//! `CommandFactory` from the parsed arguments.

use crate::error::SampleResult;
use crate::utils::logger::Logger;

/// One runnable CLI operation
pub trait Command {
    /// Runs the operation to completion
    fn execute(&self) -> SampleResult<()>;
}

/// Builds the command matching a set of CLI arguments
pub trait CommandFactory<'a> {
    /// Picks and configures a command
    ///
    /// # Arguments
    /// * `args` - CLI argument matches from clap
    /// * `logger` - Logger whose file receives a summary of each run
    ///
    /// # Returns
    /// The command, or a `Config` error for contradictory arguments
    fn create_command(&self, args: &clap::ArgMatches, logger: &'a Logger) -> SampleResult<Box<dyn Command + 'a>>;
}
