//! # Structured Logging Module
//!
//! Environment-aware structured logging for batch runs. Console output is
//! human readable by default and switches to JSON lines when
//! `TASKER_LOG_FORMAT=json`.

use crate::batch::BatchSummary;
use crate::constants::{defaults, env};
use chrono::Utc;
use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize structured logging with environment-specific configuration
pub fn init_structured_logging() {
    LOGGER_INITIALIZED.get_or_init(|| {
        let environment = get_environment();
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(get_log_level(&environment)));

        let console = if wants_json() {
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_ansi(false)
                .json()
                .with_filter(filter)
                .boxed()
        } else {
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_ansi(true)
                .with_filter(filter)
                .boxed()
        };

        // Another subscriber (a test harness, an embedding app) may already be set
        if tracing_subscriber::registry().with(console).try_init().is_err() {
            tracing::debug!("Tracing subscriber already set - continuing with existing subscriber");
        }

        tracing::info!(
            pid = std::process::id(),
            environment = %environment,
            "🔧 STRUCTURED LOGGING: Initialized"
        );
    });
}

/// Get current environment from environment variables
fn get_environment() -> String {
    std::env::var(env::TASKER_ENV)
        .or_else(|_| std::env::var("APP_ENV"))
        .unwrap_or_else(|_| defaults::ENVIRONMENT.to_string())
}

/// Get log level based on environment
fn get_log_level(environment: &str) -> String {
    match environment {
        "production" => "info".to_string(),
        _ => "debug".to_string(),
    }
}

fn wants_json() -> bool {
    std::env::var(env::LOG_FORMAT)
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

/// Log the outcome counts of a finished batch
pub fn log_batch_summary(label: &str, summary: &BatchSummary) {
    if summary.wa > 0 {
        tracing::warn!(
            batch = %label,
            total = summary.total,
            ok = summary.ok,
            wa = summary.wa,
            timestamp = %Utc::now().to_rfc3339(),
            "📦 BATCH_SUMMARY"
        );
    } else {
        tracing::info!(
            batch = %label,
            total = summary.total,
            ok = summary.ok,
            wa = summary.wa,
            timestamp = %Utc::now().to_rfc3339(),
            "📦 BATCH_SUMMARY"
        );
    }
}
