//! `state` handler.

use super::OutputFormat;
use serde::Serialize;
use statpost::{
    JsonError, PostRecord, StateRepository, StatisticsDocument, StatpostConfig, StatpostResult,
    open_store,
};

#[derive(Serialize)]
struct StateView<'a> {
    statistics: &'a StatisticsDocument,
    recent_posts: &'a [PostRecord],
    total_posts: usize,
}

/// Print the stored statistics document and the newest posts.
pub async fn show_state(
    config: &StatpostConfig,
    format: OutputFormat,
    recent: usize,
) -> StatpostResult<()> {
    let store = open_store(config).await?;
    let state = StateRepository::new(
        store,
        config.storage.statistics_key.clone(),
        config.storage.history_key.clone(),
    );
    let statistics = state.load_statistics().await?;
    let history = state.load_history().await?;
    let posts = history.recent(recent);

    match format {
        OutputFormat::Json => {
            let view = StateView {
                statistics: &statistics,
                recent_posts: posts,
                total_posts: history.len(),
            };
            let json = serde_json::to_string_pretty(&view)
                .map_err(|e| JsonError::encode("state view", e))?;
            println!("{}", json);
        }
        OutputFormat::Human => {
            println!(
                "Statistics ({} total, {} used) from {}:",
                statistics.statistics().len(),
                statistics.used().len(),
                state.backend_name()
            );
            println!("{:-<80}", "");
            for statistic in statistics.statistics() {
                let marker = if statistics.is_used(statistic) { "x" } else { " " };
                println!("[{}] {}", marker, statistic);
            }
            println!();
            println!("Recent posts ({} of {}):", posts.len(), history.len());
            println!("{:-<80}", "");
            for record in posts {
                let id = record.post_id().as_deref().unwrap_or("-");
                println!("{}  {:<9}  {}", record.timestamp(), record.status(), id);
                println!("  {}", record.post());
            }
        }
    }

    Ok(())
}
