// Declare submodules
pub mod notification_models;
pub mod notification_handlers;
pub mod notification_service;
pub mod push_transport;
pub mod expiry;
pub mod scheduler;

// Re-export public items
pub use notification_models::{ItemAlert, PushMessage};
pub use notification_handlers::notification_stream;
pub use notification_service::{BroadcastReport, NotificationService};
pub use push_transport::{PushTransport, WebPushTransport};
pub use expiry::{ExpiryNotifier, NotificationMarkers};
pub use scheduler::start_expiry_scheduler;
