//! `run` and `invoke` handlers.

use statpost::{
    Credentials, InvocationResponse, Pipeline, StatpostConfig, StatpostResult, invoke,
    log_configuration_hints,
};
use tracing::{error, info};

/// Run the pipeline once, propagating failure.
pub async fn run_once(
    mut config: StatpostConfig,
    credentials: &Credentials,
    no_publish: bool,
) -> StatpostResult<()> {
    if no_publish {
        config.publish.enabled = false;
    }

    let result = match Pipeline::from_config(&config, credentials).await {
        Ok(pipeline) => pipeline.run().await,
        Err(e) => Err(e),
    };

    match result {
        Ok(report) => {
            info!(
                statistic = ?report.statistic(),
                post_id = ?report.post_id(),
                status = %report.status(),
                refilled = report.refilled(),
                resumed = report.resumed(),
                "Run completed"
            );
            println!("{}", report.post());
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Run failed");
            log_configuration_hints(&e, credentials);
            Err(e)
        }
    }
}

/// Run the pipeline once and print the status document.
///
/// A configuration that fails to load is reported the same way as a failed run.
pub async fn invoke_once(config: StatpostResult<StatpostConfig>, credentials: &Credentials) {
    let response = match config {
        Ok(config) => invoke(&config, credentials).await,
        Err(e) => {
            error!(error = %e, "Failed to load configuration");
            InvocationResponse::failure(&e)
        }
    };

    match serde_json::to_string(&response) {
        Ok(json) => println!("{}", json),
        Err(e) => error!(error = %e, "Failed to encode response"),
    }
}
