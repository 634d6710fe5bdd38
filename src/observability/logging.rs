//! Line logging.
//!
//! Every service writes plain text lines of the form
//!
//! ```text
//! web> 15:04:05 [127.0.0.1:51234] GET /the/good/path
//! ```
//!
//! i.e. a fixed service prefix, a time-of-day stamp and the event message.
//! Events go to stdout unless a log file is configured, in which case the
//! file is opened in append mode (created if missing).

use std::fmt::Write as _;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use thiserror::Error;
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::{self, FormatEvent, FormatFields};
use tracing_subscriber::fmt::time::{ChronoLocal, FormatTime};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::fmt::FmtContext;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{layer::SubscriberExt, EnvFilter};

use crate::config::LoggingConfig;

/// Time-of-day only, no date.
const TIME_FORMAT: &str = "%H:%M:%S";

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("unable to open log file {path:?}: {source}")]
    OpenFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid log filter {directive:?}: {source}")]
    Filter {
        directive: String,
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },

    #[error("a global logger is already installed: {0}")]
    Install(#[from] TryInitError),
}

/// Event formatter producing `<prefix><HH:MM:SS> <message>` lines.
#[derive(Debug, Clone)]
pub struct PrefixedFormat {
    prefix: String,
    timer: ChronoLocal,
}

impl PrefixedFormat {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            timer: ChronoLocal::new(TIME_FORMAT.to_string()),
        }
    }
}

impl<S, N> FormatEvent<S, N> for PrefixedFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: format::Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        writer.write_str(&self.prefix)?;
        self.timer.format_time(&mut writer)?;
        writer.write_char(' ')?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

fn make_writer(config: &LoggingConfig) -> Result<BoxMakeWriter, LoggingError> {
    match &config.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|source| LoggingError::OpenFile {
                    path: path.clone(),
                    source,
                })?;
            Ok(BoxMakeWriter::new(Mutex::new(file)))
        }
        None => Ok(BoxMakeWriter::new(std::io::stdout)),
    }
}

/// Build the subscriber described by `config` without installing it.
pub fn subscriber(
    config: &LoggingConfig,
) -> Result<impl Subscriber + Send + Sync + 'static, LoggingError> {
    let filter = EnvFilter::try_new(&config.level).map_err(|source| LoggingError::Filter {
        directive: config.level.clone(),
        source,
    })?;

    let layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .event_format(PrefixedFormat::new(config.prefix.clone()))
        .with_writer(make_writer(config)?);

    Ok(tracing_subscriber::registry().with(filter).with(layer))
}

/// Install the process-wide subscriber.
pub fn init(config: &LoggingConfig) -> Result<(), LoggingError> {
    subscriber(config)?.try_init()?;
    Ok(())
}
