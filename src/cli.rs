use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{value_parser, Arg, ArgAction, ArgGroup, ArgMatches, Command};
use log::{debug, info};

use crate::catalog::{build_catalog, DEFAULT_PAGE_SIZE};
use crate::chart::PlottersBackend;
use crate::common::Destination;
use crate::config::Config;
use crate::source::gdata::GDataClient;

/// Log levels for (this application, 3rd party libraries)
fn log_levels(verbosity: u8) -> (log::LevelFilter, log::LevelFilter) {
    let internal_level = match verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,  // -v
        2 => log::LevelFilter::Debug, // -vv
        _ => log::LevelFilter::Trace, // -vvv
    };

    // Show log output for 3rd party library at -vvv
    let thirdparty_level = match verbosity {
        0..=2 => log::LevelFilter::Warn,
        _ => log::LevelFilter::Debug,
    };

    (internal_level, thirdparty_level)
}

fn config_logging(verbosity: u8) -> Result<()> {
    let (internal_level, thirdparty_level) = log_levels(verbosity);

    // stderr, as stdout may be carrying the report or image
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}[{}][{}] {}",
                chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
                record.target(),
                record.level(),
                message
            ))
        })
        .level(thirdparty_level)
        .level_for("ytstat", internal_level)
        .chain(std::io::stderr())
        .apply()?;

    Ok(())
}

fn app() -> Command {
    Command::new("ytstat")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Gather statistics of the videos uploaded by a given user")
        .arg(
            Arg::new("username")
                .required(true)
                .value_name("USERNAME")
                .help("User whose uploads are examined"),
        )
        .arg(
            Arg::new("show")
                .long("show")
                .action(ArgAction::SetTrue)
                .help("Print title, date, description and view count of each video"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE|-")
                .default_value("-")
                .help("Where --show writes to"),
        )
        .arg(
            Arg::new("plot")
                .long("plot")
                .action(ArgAction::SetTrue)
                .help("Plot view count against publish date as a PNG image"),
        )
        .arg(
            Arg::new("plot-file")
                .long("plot-file")
                .value_name("FILE|-")
                .default_value("-")
                .help("Where --plot writes the image to, must not be stdout as well as --output"),
        )
        .arg(
            Arg::new("page-size")
                .long("page-size")
                .value_name("N")
                .value_parser(value_parser!(u16).range(1..=DEFAULT_PAGE_SIZE as i64))
                .default_value("50")
                .help("Number of videos requested per feed page"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .action(ArgAction::Count)
                .global(true),
        )
        .group(
            ArgGroup::new("action")
                .args(["show", "plot"])
                .required(true)
                .multiple(true),
        )
}

/// Parse arguments, also refusing to send both the report and the image
/// to stdout
fn parse<I, T>(args: I) -> std::result::Result<ArgMatches, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let mut cmd = app();
    let app_m = cmd.try_get_matches_from_mut(args)?;

    let to_stdout = |name: &str| {
        app_m.get_one::<String>(name).map(|v| v.as_str()) == Some("-")
    };
    if app_m.get_flag("show") && app_m.get_flag("plot") && to_stdout("output") && to_stdout("plot-file") {
        return Err(cmd.error(
            ErrorKind::ArgumentConflict,
            "--show and --plot cannot both write to stdout, give --output or --plot-file a file",
        ));
    }

    Ok(app_m)
}

fn run(app_m: &ArgMatches) -> Result<()> {
    let username = app_m
        .get_one::<String>("username")
        .expect("required arg username missing");
    let page_size = *app_m
        .get_one::<u16>("page-size")
        .expect("defaulted arg page-size missing") as usize;

    debug!("Loading config");
    let cfg = Config::load()?;
    let client = GDataClient::from_config(&cfg)?;

    info!("Retrieving uploads of {:?}", username);
    let catalog = build_catalog(&client, username, page_size)?;

    if app_m.get_flag("show") {
        let output = app_m
            .get_one::<String>("output")
            .expect("defaulted arg output missing");
        crate::report::show(&catalog, &Destination::from_arg(output))?;
    }

    if app_m.get_flag("plot") {
        let plot_file = app_m
            .get_one::<String>("plot-file")
            .expect("defaulted arg plot-file missing");
        let destination = Destination::from_arg(plot_file);
        crate::chart::plot(&catalog, &destination, &PlottersBackend::default())
            .with_context(|| format!("Failed to plot uploads of {:?}", username))?;
    }

    Ok(())
}

pub fn main() -> Result<()> {
    // Parse, exiting with a usage message on bad arguments
    let app_m = parse(std::env::args_os()).unwrap_or_else(|e| e.exit());

    // Logging levels
    let verbosity = app_m.get_count("verbose");
    config_logging(verbosity)?;

    run(&app_m)
}
