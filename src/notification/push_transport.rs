use async_trait::async_trait;
use web_push::{
    ContentEncoding, IsahcWebPushClient, SubscriptionInfo, VapidSignatureBuilder, WebPushClient,
    WebPushError, WebPushMessageBuilder,
};

use crate::error::{AppError, Result};
use crate::subscription::PushSubscription;
use super::notification_models::PushMessage;

/// Delivers one message to one subscription.
#[async_trait]
pub trait PushTransport: Send + Sync {
    async fn deliver(&self, subscription: &PushSubscription, message: &PushMessage) -> Result<()>;
}

/// Web Push delivery with VAPID signing and aes128gcm payload encryption.
pub struct WebPushTransport {
    client: IsahcWebPushClient,
    vapid_pem: Vec<u8>,
    subject: String,
    ttl_secs: u32,
}

impl WebPushTransport {
    pub fn new(vapid_pem: Vec<u8>, subject: impl Into<String>) -> std::result::Result<Self, WebPushError> {
        Ok(Self {
            client: IsahcWebPushClient::new()?,
            vapid_pem,
            subject: subject.into(),
            ttl_secs: 24 * 60 * 60,
        })
    }

    fn build_message(
        &self,
        subscription: &PushSubscription,
        payload: &[u8],
    ) -> std::result::Result<web_push::WebPushMessage, WebPushError> {
        let info = SubscriptionInfo::new(
            subscription.endpoint.clone(),
            subscription.keys.p256dh.clone(),
            subscription.keys.auth.clone(),
        );

        let mut signature = VapidSignatureBuilder::from_pem(self.vapid_pem.as_slice(), &info)?;
        signature.add_claim("sub", self.subject.as_str());

        let mut builder = WebPushMessageBuilder::new(&info);
        builder.set_ttl(self.ttl_secs);
        builder.set_payload(ContentEncoding::Aes128Gcm, payload);
        builder.set_vapid_signature(signature.build()?);
        builder.build()
    }
}

#[async_trait]
impl PushTransport for WebPushTransport {
    async fn deliver(&self, subscription: &PushSubscription, message: &PushMessage) -> Result<()> {
        let payload = serde_json::to_vec(message).map_err(|_| AppError::InternalError)?;

        let push = self
            .build_message(subscription, &payload)
            .map_err(|e| AppError::Upstream(format!("web push: {}", e)))?;

        self.client
            .send(push)
            .await
            .map_err(|e| AppError::Upstream(format!("web push to {}: {}", subscription.endpoint, e)))
    }
}
