//! Wrapped invocation for schedulers that expect a status document.

use crate::{Credentials, Pipeline, RunReport, StatpostConfig};
use serde::{Deserialize, Serialize};
use statpost_error::{StatpostError, StatpostErrorKind, StatpostResult};
use tracing::{error, info, instrument, warn};

/// Status document returned to the scheduler.
///
/// ```
/// use statpost_bot::InvocationResponse;
///
/// let ok = InvocationResponse::success();
/// assert_eq!(
///     serde_json::to_string(&ok).unwrap(),
///     r#"{"statusCode":200,"body":"Tweet posted successfully"}"#
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationResponse {
    /// 200 on success, 500 on any failure
    pub status_code: u16,
    /// Human-readable outcome
    pub body: String,
}

impl InvocationResponse {
    /// Response for a completed run.
    pub fn success() -> Self {
        Self {
            status_code: 200,
            body: "Tweet posted successfully".to_string(),
        }
    }

    /// Response for a failed run.
    pub fn failure(error: &StatpostError) -> Self {
        Self {
            status_code: 500,
            body: format!("Error: {}", error),
        }
    }

    /// Response matching a run outcome.
    pub fn from_result(result: &StatpostResult<RunReport>) -> Self {
        match result {
            Ok(_) => Self::success(),
            Err(e) => Self::failure(e),
        }
    }

    /// Whether the run succeeded.
    pub fn is_success(&self) -> bool {
        self.status_code == 200
    }
}

/// Log which variables could explain `error`.
pub fn log_configuration_hints(error: &StatpostError, credentials: &Credentials) {
    if let StatpostErrorKind::Config(config_error) = error.kind() {
        if let Some(setting) = &config_error.setting {
            warn!(setting = %setting, "Check {} in your .env file or configuration.", setting);
        }
        for name in credentials.missing() {
            if config_error.setting.as_deref() != Some(name) {
                warn!(variable = name, "{} is not set. Please check your .env file.", name);
            }
        }
    } else {
        let missing = credentials.missing_publish();
        if !missing.is_empty() {
            warn!(?missing, "One or more publishing credentials are missing. Please check your .env file.");
        }
    }
}

/// Build the pipeline, run it once and fold every outcome into a response.
///
/// Never fails: errors become a 500 response after being logged together
/// with hints about missing configuration.
#[instrument(skip_all)]
pub async fn invoke(config: &StatpostConfig, credentials: &Credentials) -> InvocationResponse {
    let result = match Pipeline::from_config(config, credentials).await {
        Ok(pipeline) => pipeline.run().await,
        Err(e) => Err(e),
    };

    match &result {
        Ok(report) => info!(status = %report.status(), resumed = report.resumed(), "Run completed"),
        Err(e) => {
            error!(error = %e, "Run failed");
            log_configuration_hints(e, credentials);
        }
    }
    InvocationResponse::from_result(&result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use statpost_error::ConfigError;

    #[test]
    fn failure_body_carries_the_error() {
        let err: StatpostError = ConfigError::missing("OPENAI_API_KEY").into();
        let response = InvocationResponse::failure(&err);
        assert_eq!(response.status_code, 500);
        assert!(response.body.starts_with("Error: "));
        assert!(response.body.contains("OPENAI_API_KEY is not set"));
        assert!(!response.is_success());
    }

    #[test]
    fn serializes_with_status_code_key() {
        let err: StatpostError = ConfigError::new("x").into();
        let value = serde_json::to_value(InvocationResponse::failure(&err)).unwrap();
        assert_eq!(value["statusCode"], 500);
        assert!(value["body"].is_string());
    }
}
