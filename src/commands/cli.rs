//! Command-line argument definitions

use clap::{value_parser, Arg, ArgAction, Command as ClapCommand};

/// Builds the clap command for the `rastersample` binary
pub fn build_cli() -> ClapCommand {
    ClapCommand::new("rastersample")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Sample co-registered raster bands under vector geometries or labelled pixels")
        .arg(
            Arg::new("input")
                .help("Input GeoTIFF files, stacked in the given order")
                .required(true)
                .num_args(1..)
                .index(1),
        )
        .arg(
            Arg::new("vector")
                .long("vector")
                .help("GeoJSON file with points, polygons or line strings to sample under")
                .value_name("FILE")
                .required(false),
        )
        .arg(
            Arg::new("labels")
                .long("labels")
                .help("Label GeoTIFF; every pixel with a label is sampled")
                .value_name("FILE")
                .required(false),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .help("Output table")
                .value_name("FILE")
                .required(false),
        )
        .arg(
            Arg::new("array")
                .long("array")
                .help("Extract as masked arrays instead of a table")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("strict")
                .long("strict")
                .help("Fail when nothing is sampled inside the raster extent")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .help("Output format (csv, json, geojson); defaults to the output extension")
                .value_name("FORMAT")
                .required(false),
        )
        .arg(
            Arg::new("block-rows")
                .long("block-rows")
                .help("Raster rows read per block")
                .value_name("ROWS")
                .value_parser(value_parser!(usize))
                .required(false),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .help("TOML configuration file")
                .value_name("FILE")
                .required(false),
        )
        .arg(
            Arg::new("progress")
                .long("progress")
                .help("Show a progress bar while planning")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .help("Also write log records to this file")
                .value_name("FILE")
                .required(false),
        )
        .arg(
            Arg::new("summary-file")
                .long("summary-file")
                .help("Write a one-line summary of the run to this file")
                .value_name("FILE")
                .required(false),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose output")
                .action(ArgAction::SetTrue),
        )
}
