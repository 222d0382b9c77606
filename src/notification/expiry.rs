use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::item::{Item, ItemRepository};
use super::notification_models::ItemAlert;
use super::notification_service::NotificationService;

const MILLIS_PER_DAY: f64 = 24.0 * 60.0 * 60.0 * 1000.0;

/// Whole days until `exp`, rounded up. Negative once the date has passed.
pub fn days_until(exp: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let diff_ms = (exp - now).num_milliseconds() as f64;
    (diff_ms / MILLIS_PER_DAY).ceil() as i64
}

/// Names that already received each alert during this process lifetime.
///
/// Entries are never cleared, so a name re-added after deletion stays
/// silenced for thresholds it already crossed.
#[derive(Debug, Default)]
pub struct NotificationMarkers {
    about_to_expire: HashSet<String>,
    expired: HashSet<String>,
}

impl NotificationMarkers {
    /// Alerts `item` should trigger at `now`, marking each one as sent.
    pub fn evaluate(&mut self, item: &Item, now: DateTime<Utc>, warning_days: i64) -> Vec<ItemAlert> {
        let exp = item.exp_date.instant();
        let mut alerts = Vec::new();

        if days_until(exp, now) <= warning_days
            && exp >= now
            && self.about_to_expire.insert(item.name.clone())
        {
            alerts.push(ItemAlert::AboutToExpire);
        }

        if exp < now && self.expired.insert(item.name.clone()) {
            alerts.push(ItemAlert::Expired);
        }

        alerts
    }
}

/// Periodic sweep over the item store that raises expiry alerts.
#[derive(Clone)]
pub struct ExpiryNotifier {
    items: ItemRepository,
    notifier: NotificationService,
    markers: Arc<Mutex<NotificationMarkers>>,
    warning_days: i64,
}

impl ExpiryNotifier {
    pub fn new(items: ItemRepository, notifier: NotificationService, warning_days: i64) -> Self {
        Self {
            items,
            notifier,
            markers: Arc::new(Mutex::new(NotificationMarkers::default())),
            warning_days,
        }
    }

    pub async fn sweep(&self) -> Vec<(ItemAlert, String)> {
        self.sweep_at(Utc::now()).await
    }

    /// Evaluate every stored item against `now` and broadcast what is due.
    pub async fn sweep_at(&self, now: DateTime<Utc>) -> Vec<(ItemAlert, String)> {
        let items = self.items.find_all().await;

        let due: Vec<(ItemAlert, String)> = {
            let mut markers = self.markers.lock().await;
            items
                .iter()
                .flat_map(|item| {
                    markers
                        .evaluate(item, now, self.warning_days)
                        .into_iter()
                        .map(|alert| (alert, item.name.clone()))
                        .collect::<Vec<_>>()
                })
                .collect()
        };

        for (alert, name) in &due {
            tracing::info!("{} {}", alert.title(), name);
            self.notifier.notify_item(*alert, name).await;
        }

        due
    }
}
