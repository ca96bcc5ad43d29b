//! Tracing setup and structured invocation logging.

use std::time::Instant;

use rclip_models::HarvestJobEvent;
use tracing::{error, field, info, warn, Span};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEFAULT_DIRECTIVES: &[&str] = &["rclip=info", "aws_config=warn", "aws_smithy_runtime=warn"];

/// Initialize tracing: JSON output with `LOG_FORMAT=json`, ANSI text otherwise.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_tracing() {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let mut env_filter = EnvFilter::from_default_env();
    for directive in DEFAULT_DIRECTIVES {
        if let Ok(directive) = directive.parse() {
            env_filter = env_filter.add_directive(directive);
        }
    }

    let result = if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_current_span(true))
            .with(env_filter)
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(true).with_target(true))
            .with(env_filter)
            .try_init()
    };

    if result.is_err() {
        warn!("Tracing subscriber already installed");
    }
}

/// Invocation logger for structured logging with consistent formatting.
///
/// Every line carries the invocation's request id and the operation
/// (`stitch` or `submit`). The invocation span additionally records the
/// harvest source and input prefix once the event has been decoded, and
/// terminal lines report the elapsed time.
#[derive(Debug, Clone)]
pub struct InvocationLogger {
    request_id: String,
    operation: &'static str,
    span: Span,
    started: Instant,
}

impl InvocationLogger {
    pub fn new(request_id: &str, operation: &'static str) -> Self {
        let span = tracing::info_span!(
            "invocation",
            request_id = %request_id,
            operation = operation,
            source = field::Empty,
            prefix = field::Empty,
        );

        Self {
            request_id: request_id.to_string(),
            operation,
            span,
            started: Instant::now(),
        }
    }

    /// Attach the decoded harvest location to the invocation span.
    pub fn record_event(&self, event: &HarvestJobEvent) {
        self.span.record("source", event.source_uri().as_str());
        self.span.record("prefix", event.prefix().as_str());
    }

    pub fn log_start(&self, message: &str) {
        info!(
            request_id = %self.request_id,
            operation = self.operation,
            "Invocation started: {}", message
        );
    }

    pub fn log_progress(&self, message: &str) {
        info!(
            request_id = %self.request_id,
            operation = self.operation,
            "Invocation progress: {}", message
        );
    }

    pub fn log_warning(&self, message: &str) {
        warn!(
            request_id = %self.request_id,
            operation = self.operation,
            "Invocation warning: {}", message
        );
    }

    pub fn log_error(&self, message: &str) {
        error!(
            request_id = %self.request_id,
            operation = self.operation,
            elapsed_ms = self.elapsed_ms(),
            "Invocation failed: {}", message
        );
    }

    pub fn log_completion(&self, message: &str) {
        info!(
            request_id = %self.request_id,
            operation = self.operation,
            elapsed_ms = self.elapsed_ms(),
            "Invocation completed: {}", message
        );
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn operation(&self) -> &str {
        self.operation
    }

    /// Milliseconds since the logger was created.
    pub fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    /// Span covering the whole invocation.
    pub fn span(&self) -> &Span {
        &self.span
    }
}
