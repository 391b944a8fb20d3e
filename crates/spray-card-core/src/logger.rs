//! Stderr logging for the spray card tools.
//!
//! Records are printed as `[elapsed LEVEL stage] message`, where `stage` is
//! the pipeline module that emitted the record (`threshold`, `sections`,
//! `process`, ...). The verbosity only opens up the spray card crates;
//! decoder and other dependency records stay at `warn` so `-vv` shows the
//! pipeline and not PNG chunk chatter.

use std::io::Write;
use std::sync::OnceLock;
use std::time::Instant;

use log::{Level, LevelFilter, Log, Metadata, Record};

#[cfg(feature = "tracing")]
use tracing_subscriber::fmt::format::FmtSpan;
#[cfg(feature = "tracing")]
use tracing_subscriber::util::SubscriberInitExt;
#[cfg(feature = "tracing")]
use tracing_subscriber::{fmt, EnvFilter};

/// Crates whose records follow the requested verbosity.
const OWN_CRATES: [&str; 2] = ["spray_card_core", "spray_card"];

/// Ceiling for records from every other crate.
const DEPENDENCY_LEVEL: Level = Level::Warn;

/// Map a `-v` count to a level: none is `warn`, then `info`, `debug`,
/// `trace`.
pub fn level_from_verbosity(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn is_own_target(target: &str) -> bool {
    let krate = target.split("::").next().unwrap_or(target);
    OWN_CRATES.contains(&krate)
}

/// Pipeline stage of a record target, e.g. `threshold` for
/// `spray_card_core::threshold`. Foreign targets are kept whole.
fn stage_of(target: &str) -> &str {
    if is_own_target(target) {
        target.rsplit("::").next().unwrap_or(target)
    } else {
        target
    }
}

struct CardLogger {
    level: LevelFilter,
    started: Instant,
}

impl Log for CardLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        let level = metadata.level();
        level <= self.level && (level <= DEPENDENCY_LEVEL || is_own_target(metadata.target()))
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let elapsed = self.started.elapsed().as_secs_f64();
        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(
            stderr,
            "[{:7.3}s {:>5} {}] {}",
            elapsed,
            record.level(),
            stage_of(record.target()),
            record.args()
        );
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

static LOGGER: OnceLock<CardLogger> = OnceLock::new();

/// Install the stderr logger at `level` for the spray card crates.
///
/// Only the first call installs the logger; later calls are no-ops and keep
/// the original level.
pub fn init_with_level(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    if LOGGER.get().is_none() {
        let logger = LOGGER.get_or_init(|| CardLogger {
            level,
            started: Instant::now(),
        });
        log::set_logger(logger)?;
        log::set_max_level(level);
    }
    Ok(())
}

/// Default `tracing` filter directives: dependencies at `warn`, the spray
/// card crates at `level`.
#[cfg(feature = "tracing")]
fn default_directives(level: LevelFilter) -> String {
    let level = level.to_string().to_lowercase();
    let mut directives = DEPENDENCY_LEVEL.to_string().to_lowercase();
    for krate in OWN_CRATES {
        directives.push_str(&format!(",{krate}={level}"));
    }
    directives
}

/// Install a `tracing` fmt subscriber on stderr.
///
/// `RUST_LOG` wins when set; otherwise the filter mirrors
/// [`init_with_level`]. Span close events are reported so the instrumented
/// pipeline stages show their timings.
#[cfg(feature = "tracing")]
pub fn init_tracing(json: bool, level: LevelFilter) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(level)));
    let builder = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_span_events(FmtSpan::CLOSE);
    if json {
        let _ = builder.json().flatten_event(true).finish().try_init();
    } else {
        let _ = builder
            .with_timer(fmt::time::Uptime::default())
            .finish()
            .try_init();
    }
}
