//! OpenTelemetry instruments for chat-completion calls.
//!
//! Instruments are registered on the global meter, so they are no-ops until
//! the binary installs a meter provider.

use crate::ChatUsage;
use opentelemetry::{
    KeyValue, global,
    metrics::{Counter, Histogram},
};
use statpost_error::{ModelsError, ModelsErrorKind};
use std::sync::OnceLock;
use std::time::Duration;

static METRICS: OnceLock<ChatCallMetrics> = OnceLock::new();

/// Provider and model labels attached to every data point of one client.
#[derive(Debug, Clone)]
pub struct CallLabels {
    provider: KeyValue,
    model: KeyValue,
}

impl CallLabels {
    /// Labels for calls to `model` at `provider` (perplexity, openai).
    pub fn new(provider: &'static str, model: &str) -> Self {
        Self {
            provider: KeyValue::new("provider", provider),
            model: KeyValue::new("model", model.to_string()),
        }
    }

    fn with(&self, extra: KeyValue) -> [KeyValue; 3] {
        [self.provider.clone(), self.model.clone(), extra]
    }
}

/// Instruments for the two chat calls a run makes: the statistics batch and
/// the post text.
///
/// `llm.duration` is recorded for failures too, labeled with the outcome, so
/// slow timeouts show up next to slow successes.
pub struct ChatCallMetrics {
    requests: Counter<u64>,
    errors: Counter<u64>,
    duration: Histogram<f64>,
    tokens: Counter<u64>,
}

impl ChatCallMetrics {
    fn register() -> Self {
        let meter = global::meter("statpost_llm");
        Self {
            requests: meter
                .u64_counter("llm.requests")
                .with_description("Chat completions answered by a provider")
                .build(),
            errors: meter
                .u64_counter("llm.errors")
                .with_description("Chat completions that produced no usable reply")
                .build(),
            duration: meter
                .f64_histogram("llm.duration")
                .with_unit("s")
                .with_description("Time from request to parsed reply or failure")
                .build(),
            tokens: meter
                .u64_counter("llm.tokens")
                .with_description("Tokens billed, split by token_type")
                .build(),
        }
    }

    /// Process-wide instruments.
    pub fn global() -> &'static Self {
        METRICS.get_or_init(Self::register)
    }

    /// Record a call that returned a reply.
    pub fn succeeded(&self, labels: &CallLabels, elapsed: Duration, usage: Option<&ChatUsage>) {
        let ok = labels.with(KeyValue::new("outcome", "ok"));
        self.requests.add(1, &ok);
        self.duration.record(elapsed.as_secs_f64(), &ok);

        if let Some(usage) = usage {
            self.tokens.add(
                *usage.prompt_tokens(),
                &labels.with(KeyValue::new("token_type", "prompt")),
            );
            self.tokens.add(
                *usage.completion_tokens(),
                &labels.with(KeyValue::new("token_type", "completion")),
            );
        }
    }

    /// Record a call that failed, whether or not the provider answered.
    pub fn failed(&self, labels: &CallLabels, elapsed: Duration, error: &ModelsError) {
        let failed = labels.with(KeyValue::new("outcome", classify_error(error)));
        self.errors.add(1, &failed);
        self.duration.record(elapsed.as_secs_f64(), &failed);
    }
}

/// Metric label for a failed call.
///
/// Returns one of: "rate_limit", "auth", "server", "invalid_request",
/// "network", "parse", "empty".
pub fn classify_error(error: &ModelsError) -> &'static str {
    match &error.kind {
        ModelsErrorKind::Api { status: 429, .. } => "rate_limit",
        ModelsErrorKind::Api {
            status: 401 | 403, ..
        } => "auth",
        ModelsErrorKind::Api { status, .. } if *status >= 500 => "server",
        ModelsErrorKind::Api { .. } | ModelsErrorKind::Builder(_) => "invalid_request",
        ModelsErrorKind::Http(_) => "network",
        ModelsErrorKind::Parse(_) => "parse",
        ModelsErrorKind::NoChoices => "empty",
    }
}
