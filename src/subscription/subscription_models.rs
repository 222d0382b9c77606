use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

/// Browser `PushSubscription` as posted by the client.
///
/// Only the delivery fields are typed; anything else the browser sends
/// (`expirationTime`, vendor extensions) is kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PushSubscription {
    pub endpoint: String,
    pub keys: SubscriptionKeys,
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SubscriptionKeys {
    pub p256dh: String,
    pub auth: String,
}

impl PushSubscription {
    pub fn new(
        endpoint: impl Into<String>,
        p256dh: impl Into<String>,
        auth: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            keys: SubscriptionKeys {
                p256dh: p256dh.into(),
                auth: auth.into(),
            },
            extra: Map::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_browser_payload_round_trips_unknown_fields() {
        let raw = serde_json::json!({
            "endpoint": "https://push.example.net/abc",
            "expirationTime": null,
            "keys": {"p256dh": "BKey", "auth": "secret"}
        });

        let sub: PushSubscription = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(sub.endpoint, "https://push.example.net/abc");
        assert_eq!(sub.keys.auth, "secret");
        assert_eq!(serde_json::to_value(&sub).unwrap(), raw);
    }
}
