//! Logging setup and helpers for logging backend traffic.

use std::{fs::OpenOptions, path::Path, sync::Arc};

use tracing_subscriber::{
    EnvFilter, Layer, filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Request and response bodies longer than this many bytes are truncated in
/// `info` logs. The full body is logged at the `debug` level.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// Set up logging to stdout and, if `log_file` is given, to that file.
///
/// Stdout gets `info` and above unless `RUST_LOG` says otherwise. The log
/// file gets everything from `debug` up. If the log file cannot be opened,
/// logging continues on stdout only.
pub fn init_logging(log_file: Option<&Path>) {
    let stdout_log = tracing_subscriber::fmt::layer().pretty().with_filter(
        EnvFilter::builder()
            .with_default_directive(LevelFilter::INFO.into())
            .from_env_lossy(),
    );

    let (debug_log, file_error) = match log_file {
        Some(path) => match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => (
                Some(
                    tracing_subscriber::fmt::layer()
                        .pretty()
                        .with_ansi(false)
                        .with_writer(Arc::new(file))
                        .with_filter(LevelFilter::DEBUG),
                ),
                None,
            ),
            Err(error) => (None, Some((path.display().to_string(), error))),
        },
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(stdout_log)
        .with(debug_log)
        .init();

    if let Some((path, error)) = file_error {
        tracing::warn!("Could not open log file {path}, logging to stdout only: {error}");
    }
}

/// Cut `body` to at most [LOG_BODY_LENGTH_LIMIT] bytes without splitting a
/// character. Returns `None` if the body already fits.
fn truncate_body(body: &str) -> Option<&str> {
    if body.len() <= LOG_BODY_LENGTH_LIMIT {
        return None;
    }

    let mut end = LOG_BODY_LENGTH_LIMIT;
    while !body.is_char_boundary(end) {
        end -= 1;
    }

    Some(&body[..end])
}

pub(crate) fn log_request(method: &str, path: &str, body: &str) {
    match truncate_body(body) {
        Some(truncated) => {
            tracing::info!("Sending request: {method} {path}\nbody: {truncated}...");
            tracing::debug!("Full request body: {body:?}");
        }
        None => tracing::info!("Sending request: {method} {path}\nbody: {body:?}"),
    }
}

pub(crate) fn log_response(path: &str, status: u16, body: &str) {
    match truncate_body(body) {
        Some(truncated) => {
            tracing::info!("Received response: {status} from {path}\nbody: {truncated}...");
            tracing::debug!("Full response body: {body:?}");
        }
        None => tracing::info!("Received response: {status} from {path}\nbody: {body:?}"),
    }
}
