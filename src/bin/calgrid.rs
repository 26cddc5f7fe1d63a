extern crate calgrid as lib;

use flexi_logger::{Duplicate, FileSpec, Logger};
use lib::config::Config;
use lib::datetime::WeekStart;
use std::path::PathBuf;
use std::process::ExitCode;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "calgrid",
    about = "Calgrid - lay out calendar months as printable week grids."
)]
pub struct Args {
    #[structopt(
        name = "CONFIG",
        short = "c",
        long = "config",
        help = "path to config file",
        parse(from_os_str)
    )]
    pub configfile: Option<PathBuf>,

    #[structopt(
        short = "y",
        long = "year",
        allow_hyphen_values = true,
        help = "year of the first month, defaults to the current year"
    )]
    pub year: Option<i32>,

    #[structopt(
        short = "n",
        long = "months",
        allow_hyphen_values = true,
        help = "number of consecutive months"
    )]
    pub months: Option<i32>,

    #[structopt(short = "s", long = "start-month", help = "first month, 1-12")]
    pub start_month: Option<u32>,

    #[structopt(
        short = "w",
        long = "week-start",
        help = "first column of the week grid, 'monday' or 'sunday'"
    )]
    pub week_start: Option<String>,

    #[structopt(long = "day-numbers", help = "use the day of month as day title")]
    pub day_numbers: bool,

    #[structopt(
        short = "e",
        long = "events",
        help = "CSV file with 'date' and 'content' columns",
        parse(from_os_str)
    )]
    pub events: Option<PathBuf>,

    #[structopt(short = "t", long = "template", help = "name of the template to render")]
    pub template: Option<String>,

    #[structopt(
        long = "template-dir",
        help = "directory to look up templates in",
        parse(from_os_str)
    )]
    pub template_dir: Option<PathBuf>,

    #[structopt(
        short = "o",
        long = "output",
        help = "path of the rendered document",
        parse(from_os_str)
    )]
    pub output: Option<PathBuf>,

    #[structopt(long = "pdf", help = "compile the rendered document to PDF")]
    pub pdf: bool,

    #[structopt(long = "log-file", help = "path to log file", parse(from_os_str))]
    pub log_file: Option<PathBuf>,
}

impl Args {
    /// Command line values take precedence over the config file.
    fn apply(self, config: &mut Config) -> lib::error::Result<()> {
        if let Some(week_start) = self.week_start {
            config.week_start = week_start.parse::<WeekStart>()?;
        }
        if self.year.is_some() {
            config.year = self.year;
        }
        if let Some(months) = self.months {
            config.num_months = months;
        }
        if let Some(start_month) = self.start_month {
            config.start_month = start_month;
        }
        if self.events.is_some() {
            config.events = self.events;
        }
        if let Some(template) = self.template {
            config.template = template;
        }
        if self.template_dir.is_some() {
            config.template_dir = self.template_dir;
        }
        if let Some(output) = self.output {
            config.output = output;
        }
        config.show_day_number |= self.day_numbers;
        config.compile |= self.pdf;

        Ok(())
    }
}

fn crash_report_header() -> String {
    format!(
        "Calgrid ran into a fatal error!\n\
         Consider filing an issue with a log file and the backtrace below at {}",
        env!("CARGO_PKG_REPOSITORY")
    )
}

fn run(mut args: Args) -> Result<(), Box<dyn std::error::Error>> {
    const DEFAULT_LOG_LEVEL: &str = if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };

    let mut logger = Logger::try_with_env_or_str(DEFAULT_LOG_LEVEL)?;

    if let Some(log_file) = args.log_file.take() {
        logger = logger
            .log_to_file(FileSpec::try_from(log_file)?)
            .duplicate_to_stderr(Duplicate::Warn)
            .print_message();
    }

    let _logger = logger.start()?;

    std::panic::set_hook(Box::new(|info| {
        eprintln!("{}", crash_report_header());
        eprintln!("{}", info);
        eprintln!("{:?}", backtrace::Backtrace::new());
    }));

    let mut config = lib::config::load_suitable_config(args.configfile.as_deref())?;
    args.apply(&mut config)?;

    let artifacts = lib::app::run(&config)?;

    println!("{}", artifacts.document.display());
    if let Some(pdf) = artifacts.pdf {
        println!("{}", pdf.display());
    }

    Ok(())
}

fn main() -> ExitCode {
    match run(Args::from_args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("calgrid: {}", err);
            ExitCode::FAILURE
        }
    }
}
