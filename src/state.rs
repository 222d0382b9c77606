use anyhow::{anyhow, Context};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::item::{ItemRepository, ItemService};
use crate::notification::{ExpiryNotifier, NotificationService, PushMessage, PushTransport};
use crate::subscription::SubscriptionRepository;
use crate::upc::UpcClient;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub notification_tx: broadcast::Sender<PushMessage>,
    pub item_repository: ItemRepository,
    pub item_service: ItemService,
    pub subscription_repository: SubscriptionRepository,
    pub notification_service: NotificationService,
    pub upc_client: UpcClient,
}

impl AppState {
    /// Load persisted state and wire the services together.
    pub async fn new(config: Config, transport: Arc<dyn PushTransport>) -> anyhow::Result<Self> {
        let config = Arc::new(config);

        let item_repository = ItemRepository::load(&config.data_file).await;
        let subscription_repository = SubscriptionRepository::load(&config.subscriptions_file).await;

        let (notification_tx, _) = broadcast::channel(100);
        let notification_service = NotificationService::new(
            subscription_repository.clone(),
            transport,
            notification_tx.clone(),
        );

        let upc_client = UpcClient::new(config.upc_api_base.clone(), config.upc_token.clone())
            .context("failed to build UPC client")?;

        Ok(Self {
            item_service: ItemService::new(item_repository.clone()),
            config,
            notification_tx,
            item_repository,
            subscription_repository,
            notification_service,
            upc_client,
        })
    }

    pub fn expiry_notifier(&self) -> ExpiryNotifier {
        ExpiryNotifier::new(
            self.item_repository.clone(),
            self.notification_service.clone(),
            self.config.expiry_warning_days,
        )
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub data_file: PathBuf,
    pub subscriptions_file: PathBuf,
    pub upc_api_base: String,
    pub upc_token: String,
    pub vapid_private_key_file: PathBuf,
    pub vapid_subject: String,
    pub expiry_check_schedule: String,
    pub expiry_warning_days: i64,
}

impl Config {
    /// Read configuration from the environment. Missing credentials are
    /// errors; everything else has a default.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| anyhow!("{} must be set", key))
        };

        Ok(Self {
            host: var("HOST", "127.0.0.1"),
            port: var("PORT", "3000")
                .parse()
                .context("PORT must be a number")?,
            data_file: var("DATA_FILE", "data.json").into(),
            subscriptions_file: var("SUBSCRIPTIONS_FILE", "subscriptions.json").into(),
            upc_api_base: var("UPC_API_BASE", "https://api.upcdatabase.org"),
            upc_token: required("UPC_DATABASE_TOKEN")?,
            vapid_private_key_file: required("VAPID_PRIVATE_KEY_FILE")?.into(),
            vapid_subject: var("VAPID_SUBJECT", "mailto:admin@localhost"),
            expiry_check_schedule: var("EXPIRY_CHECK_SCHEDULE", "*/10 * * * * *"),
            expiry_warning_days: var("EXPIRY_WARNING_DAYS", "2")
                .parse()
                .context("EXPIRY_WARNING_DAYS must be a number")?,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
