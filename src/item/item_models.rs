use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use utoipa::ToSchema;

/// A perishable tracked in the fridge. `name` is the unique key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Item {
    pub name: String,
    #[serde(rename = "expDate")]
    #[schema(value_type = String, example = "2024-01-10")]
    pub exp_date: ExpirationDate,
}

impl Item {
    pub fn new(name: impl Into<String>, exp_date: ExpirationDate) -> Self {
        Self {
            name: name.into(),
            exp_date,
        }
    }
}

/// Expiration date as submitted by the client.
///
/// Keeps the original text so listings echo it back unchanged, along with the
/// instant it denotes. A bare `YYYY-MM-DD` means midnight UTC.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpirationDate {
    raw: String,
    at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
#[error("invalid expiration date '{0}', expected YYYY-MM-DD or RFC 3339")]
pub struct InvalidDate(pub String);

impl ExpirationDate {
    pub fn parse(raw: &str) -> Result<Self, InvalidDate> {
        let trimmed = raw.trim();

        let at = if let Ok(ts) = DateTime::parse_from_rfc3339(trimmed) {
            ts.with_timezone(&Utc)
        } else {
            let date = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .map_err(|_| InvalidDate(raw.to_string()))?;
            let midnight = date
                .and_hms_opt(0, 0, 0)
                .ok_or_else(|| InvalidDate(raw.to_string()))?;
            Utc.from_utc_datetime(&midnight)
        };

        Ok(Self {
            raw: trimmed.to_string(),
            at,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn instant(&self) -> DateTime<Utc> {
        self.at
    }
}

impl fmt::Display for ExpirationDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for ExpirationDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for ExpirationDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        ExpirationDate::parse(&raw).map_err(serde::de::Error::custom)
    }
}
