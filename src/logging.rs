//! Tracing subscriber setup used by the service.

use std::{env, sync::OnceLock};

use tracing_appender::{
    non_blocking,
    non_blocking::NonBlocking,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{
    EnvFilter,
    fmt::{fmt, time::ChronoLocal, writer::MakeWriterExt},
};

/// Guard to ensure buffered logs are flushed on shutdown.
static LOG_GUARD: OnceLock<non_blocking::WorkerGuard> = OnceLock::new();

pub fn init() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = fmt()
        .with_env_filter(env_filter)
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(false)
        .with_level(true);

    match env::var("LOG_DIR").ok().and_then(init_file_writer) {
        Some(file_writer) => {
            let stdout = std::io::stdout.with_max_level(tracing::Level::INFO);
            builder
                .with_ansi(false)
                .with_writer(stdout.and(file_writer))
                .init();
        }
        None => builder.with_ansi(true).init(),
    }

    tracing::info!("logger initialized");
}

fn init_file_writer(dir: String) -> Option<NonBlocking> {
    let max_files = env::var("LOG_MAX_FILES")
        .ok()
        .and_then(|v| v.parse::<usize>().ok());

    let mut file_builder = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("lptrail.log");

    if let Some(n) = max_files {
        file_builder = file_builder.max_log_files(n);
    }

    let file_appender = match file_builder.build(&dir) {
        Ok(appender) => appender,
        Err(e) => {
            eprintln!("failed to create log file in {dir}: {e}, logging to stdout only");
            return None;
        }
    };

    let (file_writer, guard) = non_blocking(file_appender);

    // A second init keeps the first guard, which is the one still flushing.
    let _ = LOG_GUARD.set(guard);

    Some(file_writer)
}
