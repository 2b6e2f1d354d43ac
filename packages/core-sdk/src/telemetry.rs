//! Opt-in append-only log of endpoint calls and upstream attempts.
//! Lines never contain credentials or user text, only ids and sizes.

use std::{fs::OpenOptions, io::Write, path::PathBuf};

use anyhow::Result;
use once_cell::sync::Lazy;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

use crate::{catalog::Provider, error::AttemptError};

static TELEMETRY_ENABLED: Lazy<std::sync::RwLock<bool>> =
    Lazy::new(|| std::sync::RwLock::new(false));

const LOG_DIR: &str = "logs";
const LOG_FILE: &str = "synapse.log";

pub fn set_enabled(enabled: bool) {
    if let Ok(mut guard) = TELEMETRY_ENABLED.write() {
        *guard = enabled;
    }
}

pub fn is_enabled() -> bool {
    TELEMETRY_ENABLED.read().map(|g| *g).unwrap_or(false)
}

/**
 * \brief One inbound API call, e.g. `log_call("analyze", "groq", &[("response_len", 42)])`.
 */
pub fn log_call(endpoint: &str, provider: &str, sizes: &[(&str, usize)]) {
    let mut message = format!("provider={}", provider);
    for (name, value) in sizes {
        message.push_str(&format!(" {}={}", name, value));
    }
    record("INFO", &format!("api.{}", endpoint), &message);
}

/**
 * \brief Outcome of a single upstream attempt; `None` means it succeeded.
 */
pub fn log_attempt(provider: Provider, model: &str, failure: Option<&AttemptError>) {
    match failure {
        None => record("INFO", "attempt", &format!("ok provider={} model={}", provider, model)),
        Some(err) => record(
            "WARN",
            "attempt",
            &format!("fail provider={} model={} reason={}", provider, model, err),
        ),
    }
}

/**
 * \brief Failure outside the fallback chain (e.g. the legacy prompt endpoint).
 */
pub fn log_error(category: &str, message: &str) {
    record("ERROR", category, message);
}

fn record(level: &str, category: &str, message: &str) {
    if !is_enabled() {
        return;
    }
    if let Err(err) = append_line(level, category, message) {
        tracing::warn!("telemetry write failed: {}", err);
    }
}

fn append_line(level: &str, category: &str, message: &str) -> Result<()> {
    let dir = PathBuf::from(LOG_DIR);
    std::fs::create_dir_all(&dir)?;
    let timestamp = OffsetDateTime::now_utc().format(&Rfc3339)?;
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(LOG_FILE))?;
    writeln!(file, "{} [{}] {} - {}", timestamp, level, category, message)?;
    Ok(())
}
