pub mod subscription_models;
pub mod subscription_repository;
pub mod subscription_handlers;

pub use subscription_models::{PushSubscription, SubscriptionKeys};
pub use subscription_repository::SubscriptionRepository;
pub use subscription_handlers::subscribe;
