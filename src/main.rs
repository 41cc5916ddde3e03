//! Onegin sort command line front end

use clap::{Arg, ArgAction, Command};
use env_logger::Env;
use std::process;

use onegin_sort::{
    config::{Algorithm, OutputFilter, SortConfig, SortConfigBuilder, DEFAULT_OUTPUT_FILE},
    error::{OneginError, OneginResult},
    sort,
};

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    match run() {
        Ok(exit_code) => process::exit(exit_code),
        Err(e) => {
            eprintln!("onegin: {}", e);
            process::exit(e.exit_code());
        }
    }
}

fn run() -> OneginResult<i32> {
    let args: Vec<String> = std::env::args().collect();
    let converted_args = convert_legacy_syntax(&args);

    let matches = build_cli().get_matches_from(converted_args);
    let config = parse_config_from_matches(&matches)?;

    sort(&config)
}

fn build_cli() -> Command {
    Command::new("onegin")
        .version(env!("CARGO_PKG_VERSION"))
        .override_usage("onegin [OPTION]... FILE")
        .about("Sort the lines of a poem by their letters alone")
        .long_about(
            "Sort the lines of a poem by their letters alone.\n\n\
             Characters other than A-Z and a-z are skipped and case is ignored. \
             Lines are compared from their first letter, or from their last one \
             with --reversed, and the result is written to output.txt unless -o is given.",
        )
        .arg(Arg::new("file")
            .help("Input file to sort")
            .required(true)
            .value_name("FILE"))
        .arg(Arg::new("output")
            .short('o')
            .long("output")
            .help("Write result to FILE")
            .value_name("FILE")
            .default_value(DEFAULT_OUTPUT_FILE))
        .arg(Arg::new("reversed")
            .short('r')
            .long("reversed")
            .help("Compare lines from their last letter backwards")
            .action(ArgAction::SetTrue))
        .arg(Arg::new("algorithm")
            .short('a')
            .long("algorithm")
            .help("Sorting algorithm")
            .value_name("ALGO")
            .value_parser(["tree", "quick"])
            .default_value("tree"))
        .arg(Arg::new("filter")
            .long("filter")
            .help("Which sorted lines to write")
            .long_help("Which sorted lines to write: all lines, non-empty lines, or verse lines (an uppercase letter followed by a lowercase one after leading blanks, written without those blanks)")
            .value_name("FILTER")
            .value_parser(["all", "non-empty", "verse"])
            .default_value("non-empty"))
        .arg(Arg::new("append-original")
            .long("append-original")
            .help("Write the original text after the sorted lines")
            .action(ArgAction::SetTrue))
        .arg(Arg::new("check")
            .short('c')
            .long("check")
            .help("Check for sorted input; do not sort")
            .action(ArgAction::SetTrue))
        .arg(Arg::new("parallel-threshold")
            .long("parallel-threshold")
            .help("Sort in parallel from N lines on (quick sort only)")
            .value_name("N"))
}

/// Rewrite the historical `--r` and `-reversed` spellings to `--reversed`
fn convert_legacy_syntax(args: &[String]) -> Vec<String> {
    args.iter()
        .map(|arg| match arg.as_str() {
            "--r" | "-reversed" => "--reversed".to_string(),
            _ => arg.clone(),
        })
        .collect()
}

/// Parse configuration from command line matches
fn parse_config_from_matches(matches: &clap::ArgMatches) -> OneginResult<SortConfig> {
    let mut builder = SortConfigBuilder::new();

    if let Some(file) = matches.get_one::<String>("file") {
        builder = builder.input_file(file);
    }
    if let Some(output) = matches.get_one::<String>("output") {
        builder = builder.output_file(output);
    }
    if matches.get_flag("reversed") {
        builder = builder.reversed();
    }
    if let Some(algorithm) = matches.get_one::<String>("algorithm") {
        builder = builder.algorithm(algorithm.parse::<Algorithm>()?);
    }
    if let Some(filter) = matches.get_one::<String>("filter") {
        builder = builder.filter(filter.parse::<OutputFilter>()?);
    }
    if matches.get_flag("append-original") {
        builder = builder.append_original();
    }
    if matches.get_flag("check") {
        builder = builder.check();
    }
    if let Some(threshold) = matches.get_one::<String>("parallel-threshold") {
        let lines: usize = threshold.parse().map_err(|_| {
            OneginError::invalid_argument(&format!("invalid parallel threshold: {threshold}"))
        })?;
        builder = builder.parallel_threshold(lines);
    }

    builder.build()
}
