//! Wire shape of MercadoLibre webhook notifications.

use serde::{Deserialize, Deserializer};

/// Notification body as posted by the provider. Missing fields default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MlWebhookPayload {
    pub id: i64,
    pub live_mode: bool,
    #[serde(rename = "type")]
    pub topic: String,
    pub date_created: String,
    pub user_id: i64,
    pub api_version: String,
    pub action: String,
    pub data: MlWebhookData,
}

/// Reference to the resource the notification is about.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MlWebhookData {
    /// Resource id. Sent as a string by most topics and as a number by some.
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Signed(i64),
        Unsigned(u64),
    }

    Ok(match Option::<RawId>::deserialize(deserializer)? {
        Some(RawId::Text(s)) => s,
        Some(RawId::Signed(n)) => n.to_string(),
        Some(RawId::Unsigned(n)) => n.to_string(),
        None => String::new(),
    })
}
