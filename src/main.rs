mod app;
mod appointment;
mod calendar;
mod clock;
mod details;
mod goto;
mod help;
mod labels;
mod theme;
use crate::app::App;
use crate::appointment::{AppointmentSource, JsonFileSource, NoAppointments};
use crate::clock::LocalClock;
use anyhow::Context;
use lexopt::{Arg, Parser, ValueExt};
use ratatui::DefaultTerminal;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use time::{format_description::FormatItem, macros::format_description, Date};
use tracing_subscriber::EnvFilter;

static YMD_FMT: &[FormatItem<'_>] = format_description!("[year]-[month]-[day]");

#[derive(Clone, Debug, Eq, PartialEq)]
enum Command {
    Run(RunOptions),
    Help,
    Version,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
struct RunOptions {
    date: Option<Date>,
    appointments: Option<PathBuf>,
    user: Option<String>,
    log_file: Option<PathBuf>,
}

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut opts = RunOptions::default();
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                Arg::Short('f') | Arg::Long("appointments") => {
                    opts.appointments = Some(PathBuf::from(parser.value()?));
                }
                Arg::Short('u') | Arg::Long("user") => {
                    opts.user = Some(parser.value()?.string()?);
                }
                Arg::Long("log-file") => {
                    opts.log_file = Some(PathBuf::from(parser.value()?));
                }
                Arg::Value(value) if opts.date.is_none() => {
                    let value = value.string()?;
                    match Date::parse(&value, &YMD_FMT) {
                        Ok(d) => opts.date = Some(d),
                        Err(e) => {
                            return Err(lexopt::Error::ParsingFailed {
                                value,
                                error: Box::new(e),
                            })
                        }
                    }
                }
                _ => return Err(arg.unexpected()),
            }
        }
        if opts.user.is_some() && opts.appointments.is_none() {
            return Err(lexopt::Error::from("--user requires --appointments"));
        }
        Ok(Command::Run(opts))
    }

    fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Run(opts) => {
                if let Some(ref path) = opts.log_file {
                    init_logging(path)?;
                }
                let clock = LocalClock::new().context("failed to determine local timezone")?;
                match opts.appointments {
                    Some(ref path) => {
                        let source = JsonFileSource::new(path).client_email(opts.user);
                        run_calendar(source, clock, opts.date)
                    }
                    None => run_calendar(NoAppointments, clock, opts.date),
                }
            }
            Command::Help => {
                println!("Usage: pawcal [options] [YYYY-MM-DD]");
                println!();
                println!("Terminal month calendar of pet-service appointments");
                println!();
                println!("Options:");
                println!("  -f, --appointments <FILE>");
                println!("                    Load appointments from a JSON export");
                println!("  -u, --user <EMAIL>");
                println!("                    Only show appointments booked by this client");
                println!("                    (requires --appointments)");
                println!("  --log-file <FILE> Write log messages to the given file");
                println!("  -h, --help        Display this help message and exit");
                println!("  -V, --version     Show the program version and exit");
                Ok(())
            }
            Command::Version => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

fn run_calendar<S: AppointmentSource>(
    source: S,
    clock: LocalClock,
    date: Option<Date>,
) -> anyhow::Result<()> {
    let appointments = source
        .fetch()
        .with_context(|| format!("failed to load appointments from {}", source.describe()))?;
    let mut app = App::new(source, clock, appointments);
    if let Some(date) = date {
        app = app.reference_date(date);
    }
    with_terminal(|mut terminal| {
        terminal.hide_cursor().context("failed to hide cursor")?;
        app.run(&mut terminal).context("error running calendar")
    })
}

fn main() -> anyhow::Result<()> {
    Command::from_parser(Parser::from_env())?.run()
}

fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn with_terminal<F, T>(func: F) -> anyhow::Result<T>
where
    F: FnOnce(DefaultTerminal) -> anyhow::Result<T>,
{
    let terminal = ratatui::init();
    let r = func(terminal);
    ratatui::restore();
    r
}
