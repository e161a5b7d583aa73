//! Process-wide `tracing` setup for the `mk-*` binaries.
//!
//! Command output goes to stdout, so log lines never do: they land on
//! stderr, or in `$MK_LOG_DIR/<app>.log` (rotated daily) when that
//! directory is configured and writable.

use std::any::Any;
use std::panic;
use std::path::PathBuf;
use std::sync::OnceLock;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

const LOG_DIR_ENV: &str = "MK_LOG_DIR";
const BACKTRACE_ENV: &str = "MK_LOG_INCLUDE_BACKTRACE";
const DEFAULT_FILTER: &str = "info";

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Report panics as `error` events tagged with `app_name`.
///
/// Repeat calls are ignored. With `MK_LOG_INCLUDE_BACKTRACE` set to `1` or
/// `true` the previous hook still runs afterwards.
pub fn install_tracing_panic_hook(app_name: &'static str) {
    static INSTALLED: OnceLock<()> = OnceLock::new();

    INSTALLED.get_or_init(|| {
        let previous = panic::take_hook();
        let chain_previous = std::env::var(BACKTRACE_ENV)
            .map(|raw| is_enabled(&raw))
            .unwrap_or(false);

        panic::set_hook(Box::new(move |info| {
            let thread = std::thread::current();
            let location = info
                .location()
                .map(|loc| format!("{}:{}", loc.file(), loc.line()));

            tracing::error!(
                application = app_name,
                thread_name = thread.name().unwrap_or("unnamed"),
                location = location.as_deref().unwrap_or("unknown"),
                panic_message = %panic_message(info.payload()),
                "panic captured"
            );

            if chain_previous {
                previous(info);
            }
        }));
    });
}

/// Install the global subscriber once. `RUST_LOG` overrides the `info`
/// default filter.
pub fn init_tracing_subscriber(app_name: &'static str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let writer = file_writer(app_name).unwrap_or_else(|| BoxMakeWriter::new(std::io::stderr));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .try_init();
}

fn file_writer(app_name: &'static str) -> Option<BoxMakeWriter> {
    let dir = PathBuf::from(std::env::var_os(LOG_DIR_ENV)?);
    if let Err(err) = std::fs::create_dir_all(&dir) {
        // No subscriber exists yet.
        eprintln!("cannot create {LOG_DIR_ENV} {}: {err}; using stderr", dir.display());
        return None;
    }

    let appender = tracing_appender::rolling::daily(dir, format!("{app_name}.log"));
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let _ = LOG_GUARD.set(guard);
    Some(BoxMakeWriter::new(writer))
}

fn is_enabled(raw: &str) -> bool {
    let raw = raw.trim();
    raw == "1" || raw.eq_ignore_ascii_case("true")
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
