use std::time::Duration;

use tokio::{task::JoinHandle, time::interval};
use tracing::{error, info};

use crate::db::dao::{DaoContext, DaoResult};

/// Rows removed by one purge pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PurgeReport {
    pub refresh_tokens: u64,
    pub reset_tokens: u64,
}

/// Deletes expired refresh and password-reset tokens.
pub async fn run_purge(daos: &DaoContext) -> DaoResult<PurgeReport> {
    let refresh_tokens = daos.refresh_token().purge_expired().await?;
    let reset_tokens = daos.password_reset().purge_expired().await?;
    Ok(PurgeReport {
        refresh_tokens,
        reset_tokens,
    })
}

/// Runs [`run_purge`] every `every`, starting immediately.
pub fn spawn_purge_job(daos: DaoContext, every: Duration) -> JoinHandle<()> {
    info!(interval_secs = every.as_secs(), "starting expired token purge job");

    tokio::spawn(async move {
        let mut ticker = interval(every);
        loop {
            ticker.tick().await;

            match run_purge(&daos).await {
                Ok(report) if report == PurgeReport::default() => {
                    info!("token purge: nothing expired");
                }
                Ok(report) => info!(
                    refresh_tokens = report.refresh_tokens,
                    reset_tokens = report.reset_tokens,
                    "purged expired tokens"
                ),
                Err(err) => error!("failed to purge expired tokens: {err}"),
            }
        }
    })
}
