use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};
use tracing::info;

use super::expiry::ExpiryNotifier;

/// Run the expiry sweep on `schedule` (six-field cron, seconds first).
///
/// The returned scheduler must be kept alive for the job to keep firing.
pub async fn start_expiry_scheduler(
    notifier: ExpiryNotifier,
    schedule: &str,
) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;

    let job = Job::new_async(schedule, move |_uuid, _l| {
        let notifier = notifier.clone();

        Box::pin(async move {
            let alerts = notifier.sweep().await;
            if !alerts.is_empty() {
                info!("Expiry sweep raised {} alerts", alerts.len());
            }
        })
    })?;

    scheduler.add(job).await?;
    scheduler.start().await?;

    info!("Expiry notifier started with schedule '{}'", schedule);
    Ok(scheduler)
}
