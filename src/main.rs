// `error_chain!` can recurse deeply
#![recursion_limit = "1024"]

extern crate clap;
extern crate filetime;
extern crate regex;
#[macro_use]
extern crate log;
extern crate log4rs;
#[macro_use]
extern crate error_chain;

// For testing in submodules
#[cfg(test)]
extern crate rand;

use clap::{App, Arg, ArgMatches};
use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;

mod context;
mod copier;
mod directive;
mod error;
mod mapping;
mod report;

#[cfg(test)]
mod testutils;

use context::CopyContext;
use copier::Copier;
use directive::*;
use error::*;
use mapping::MappingTables;
use report::LogReporter;

use std::path::PathBuf;

fn main() {
    let argument_matches = create_app().get_matches();

    if let Err(ref error) = configure_logging(logging_level(&argument_matches)) {
        eprintln!("Unable to configure logging: {}", error);
        ::std::process::exit(1);
    }

    // If there was an error, nicely print it and the related causes
    if let Err(ref error) = run(argument_matches) {
        error!("Error: {}", error);
        for cause in error.iter().skip(1) {
            error!("caused by: {}", cause);
        }
        ::std::process::exit(1);
    } else {
        ::std::process::exit(0);
    }
}

fn create_app<'a,'b>() -> App<'a,'b> {
    App::new("rename-copy")
        .version("0.1")
        .author("Mitch S. <mitch+map@applicative.us>")
        .about("Copies files into renamed folders, translating folder and file names through lookup tables")
        .arg(
            Arg::with_name("mappings-file")
                .short("m")
                .long("mappings")
                .value_name("FILE")
                .help("Sets the file to read folder and file name mappings from (built-in tables when absent)")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("source-dir")
                .short("s")
                .long("source-dir")
                .value_name("DIRECTORY")
                .help("Sets the directory containing the source folders")
                .takes_value(true)
                .default_value("."),
        )
        .arg(
            Arg::with_name("dest-dir")
                .short("d")
                .long("dest-dir")
                .value_name("DIRECTORY")
                .help("Sets the directory to create the renamed folders in")
                .takes_value(true)
                .default_value("."),
        )
        .arg(
            Arg::with_name("v")
                .short("v")
                .multiple(true)
                .help("Sets the level of verbosity"),
        )
        .arg(
            Arg::with_name("quiet")
                .short("q")
                .long("quiet")
                .conflicts_with("v")
                .help("Only reports warnings and errors"),
        )
        .arg(
            Arg::with_name("dry-run")
                .short("n")
                .long("dry-run")
                .help("Sets whether or not to actually write to the filesystem"),
        )
}

fn logging_level(matches: &ArgMatches) -> LevelFilter {
    if matches.is_present("quiet") {
        return LevelFilter::Warn;
    }
    match matches.occurrences_of("v") {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn configure_logging(level: LevelFilter) -> Result<()> {
    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new("{h({m})}{n}")))
        .build();
    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(Root::builder().appender("stdout").build(level))
        .map_err(|error| Error::from(format!("Invalid logging configuration: {}", error)))?;
    log4rs::init_config(config)
        .map_err(|error| Error::from(format!("Unable to install logger: {}", error)))?;
    Ok(())
}

fn run(matches: ArgMatches) -> Result<()> {
    let tables: MappingTables = match matches.value_of("mappings-file") {
        Some(file) => tables_from_file(&create_directives(), &PathBuf::from(file))?,
        None => MappingTables::builtin(),
    };
    debug!("Loaded {} folder mapping(s) and {} file mapping(s)", tables.folders().len(), tables.file_count());

    // Safe to unwrap these, as we have defaults
    let file_context = CopyContext {
        source_dir: PathBuf::from(matches.value_of("source-dir").unwrap()),
        dest_dir: PathBuf::from(matches.value_of("dest-dir").unwrap()),
        dry_run: matches.is_present("dry-run"),
    };
    debug!("{:?}", file_context);

    let results = Copier::new(&tables).copy_all(&file_context, &mut LogReporter)?;
    for result in results.iter().filter(|result| !result.unmapped.is_empty()) {
        debug!("{} unmapped file(s) left in {} (copied {} into {})", result.unmapped.len(),
               result.source_folder, result.copied, result.dest_folder);
    }

    Ok(())
}
