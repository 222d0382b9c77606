use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Payload delivered to subscribed devices. The service worker renders
/// `title`/`body` and navigates to `redirectUrl` on click.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PushMessage {
    pub title: String,
    pub body: String,
    #[serde(rename = "redirectUrl")]
    pub redirect_url: String,
}

impl PushMessage {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            redirect_url: "/".to_string(),
        }
    }
}

/// Item events that produce a push notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemAlert {
    Added,
    AboutToExpire,
    Expired,
}

impl ItemAlert {
    pub fn title(&self) -> &'static str {
        match self {
            ItemAlert::Added => "Item added!",
            ItemAlert::AboutToExpire => "Item is about to expire!",
            ItemAlert::Expired => "Item has expired!",
        }
    }

    pub fn body(&self, item_name: &str) -> String {
        let what = match self {
            ItemAlert::Added => "has been added to the fridge",
            ItemAlert::AboutToExpire => "is about to expire",
            ItemAlert::Expired => "has expired",
        };
        format!("Your item {} {}", item_name, what)
    }
}
