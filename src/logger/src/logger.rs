use std::{borrow::Cow, io::Write};

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use indicatif_log_bridge::LogWrapper;
use log::{Level, LevelFilter};
use env_logger::{Builder, Env, fmt::Color};
use once_cell::sync::OnceCell;
use thiserror::Error;

static INSTANCE: OnceCell<Logger> = OnceCell::new();

/// Environment variable which may override the command line verbosity (e.g. `ADMIXCALC_LOG=debug`)
pub const LOG_ENV_VAR: &str = "ADMIXCALC_LOG";

const SPINNER_TEMPLATE: &str = "{spinner:.green} [{elapsed_precise}] {msg}: {human_pos} lines";

#[derive(Error, Debug)]
pub enum LoggerError {
    #[error("Failed to register the global logger. Has it already been initialized?")]
    SetLogger(#[from] log::SetLoggerError),

    #[error("Logger was initialized twice")]
    AlreadyInitialized,
}

#[derive(Debug)]
pub struct Logger {
    multi_pg: MultiProgress,
}


impl Logger {

    /// Register the global logger, with a default level matching `verbosity`.
    /// Log lines are routed through a `MultiProgress` so that they never tear progress spinners.
    pub fn init(verbosity: u8) -> Result<(), LoggerError> {
        let log_level = Self::u8_to_loglevel(verbosity);
        let env = Env::default()
            .filter(LOG_ENV_VAR);

        let logger = Builder::new().filter_level(log_level)
            .format(|buf, record| {
                let is_error = record.level() == Level::Error;
                let traceback = match is_error {
                    true  => format!("(@ {}:{}) ", record.file().unwrap_or("unknown"), record.line().unwrap_or(0)),
                    false => String::new(),
                };

                let mut arg_style = buf.style();
                arg_style.set_intense(is_error);

                let mut level_style = buf.style();
                let color = match record.level() {
                    Level::Error => Color::Red,
                    Level::Warn  => Color::Yellow,
                    Level::Info  => Color::Green,
                    Level::Debug => Color::Blue,
                    Level::Trace => Color::Cyan
                };
                level_style.set_color(color).set_bold(true);

                writeln!(
                    buf,
                    "[{} {: <5} {}] {traceback}{}",
                    chrono::Local::now().format("%Y-%m-%dT%H:%M:%S"),
                    level_style.value(record.level()),
                    record.target(),
                    arg_style.value(record.args())
                )
            })
            .parse_env(env)
            .build();

        let multi_pg = MultiProgress::new();
        LogWrapper::new(multi_pg.clone(), logger).try_init()?;
        INSTANCE.set(Self{multi_pg}).map_err(|_| LoggerError::AlreadyInitialized)
    }

    fn u8_to_loglevel(verbosity: u8) -> LevelFilter {
        match verbosity {
            0            => LevelFilter::Error,
            1            => LevelFilter::Warn,
            2            => LevelFilter::Info,
            3            => LevelFilter::Debug,
            4..= u8::MAX => LevelFilter::Trace
        }
    }

    pub fn set_level(verbosity: u8) {
        log::set_max_level(Self::u8_to_loglevel(verbosity));
    }

    /// Return the shared `MultiProgress`, if the logger was initialized.
    pub fn multi() -> Option<&'static MultiProgress> {
        INSTANCE.get().map(|logger| &logger.multi_pg)
    }

    /// Create a line-counting spinner, attached to the logger's `MultiProgress`.
    /// Returns a hidden (no-op) spinner when the logger was never initialized (e.g. within tests).
    pub fn spinner(message: impl Into<Cow<'static, str>>) -> ProgressBar {
        let spinner = match Self::multi() {
            Some(multi) => multi.add(ProgressBar::new_spinner()),
            None        => ProgressBar::hidden(),
        };
        let style = ProgressStyle::with_template(SPINNER_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        spinner.set_style(style);
        spinner.set_message(message);
        spinner
    }
}
