// Panel API data types
//
// DTOs for the 3X-UI `/panel/api/inbounds` endpoints. Every response is
// wrapped in the `ApiResponse<T>` envelope. Most structs use `#[serde(default)]`
// because the panel omits or nulls fields freely across releases, and carry
// an `extra` catch-all so protocol-specific keys survive a read-modify-write.

use chrono::{DateTime, Utc};
use serde::de::{self, DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Error;

// ── Response Envelope ────────────────────────────────────────────────

/// Standard panel response envelope.
///
/// ```json
/// { "success": true, "msg": "optional", "obj": ... }
/// ```
///
/// `obj` is absent or `null` for void operations and "not found" lookups.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default)]
    pub msg: Option<String>,
    /// Absent and `null` both decode to `None`.
    pub obj: Option<T>,
}

// ── Embedded JSON ────────────────────────────────────────────────────

/// A JSON document the panel stores as a string inside another document.
///
/// `settings`, `streamSettings`, `sniffing` and `allocate` arrive as JSON
/// text on most panel versions and as inline objects on some. Both forms
/// deserialize into this type; it always serializes back as text, which is
/// what the panel accepts on write. Parse it with [`EmbeddedJson::parse`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "EmbeddedForm", into = "String")]
pub struct EmbeddedJson(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum EmbeddedForm {
    Text(String),
    Inline(serde_json::Value),
}

impl From<EmbeddedForm> for EmbeddedJson {
    fn from(form: EmbeddedForm) -> Self {
        match form {
            EmbeddedForm::Text(text) => Self(text),
            EmbeddedForm::Inline(serde_json::Value::Null) => Self::default(),
            EmbeddedForm::Inline(value) => Self(value.to_string()),
        }
    }
}

impl From<EmbeddedJson> for String {
    fn from(json: EmbeddedJson) -> Self {
        json.0
    }
}

impl EmbeddedJson {
    /// Wrap already-serialized JSON text.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Serialize `value` into embedded text.
    pub fn from_value<T: Serialize>(value: &T) -> Result<Self, Error> {
        Ok(Self(serde_json::to_string(value)?))
    }

    /// The raw JSON text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `true` when the text is empty or whitespace.
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Parse the embedded text as `T`.
    ///
    /// Malformed text is a `Deserialization` error carrying the raw text.
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, Error> {
        serde_json::from_str(&self.0).map_err(|e| Error::decode(&e, &self.0))
    }

    /// Parse as untyped JSON. Empty text yields `Value::Null`.
    pub fn to_value(&self) -> Result<serde_json::Value, Error> {
        if self.is_empty() {
            return Ok(serde_json::Value::Null);
        }
        self.parse()
    }
}

// ── Inbound ──────────────────────────────────────────────────────────

/// A proxy listener configuration from `inbounds/list` or `inbounds/get/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Inbound {
    pub id: i64,
    pub up: i64,
    pub down: i64,
    pub total: i64,
    pub remark: String,
    pub enable: bool,
    /// Milliseconds since the epoch; 0 means "never".
    pub expiry_time: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub client_stats: Vec<ClientTraffic>,
    pub listen: String,
    pub port: u16,
    pub protocol: String,
    pub settings: EmbeddedJson,
    pub stream_settings: EmbeddedJson,
    pub tag: String,
    pub sniffing: EmbeddedJson,
    pub allocate: EmbeddedJson,
    /// Catch-all for fields newer panels add.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Inbound {
    /// Decode the embedded `settings` document.
    ///
    /// An empty `settings` string yields `Settings::default()`.
    pub fn settings(&self) -> Result<Settings, Error> {
        if self.settings.is_empty() {
            return Ok(Settings::default());
        }
        self.settings.parse()
    }

    /// Replace the embedded `settings` document.
    pub fn set_settings(&mut self, settings: &Settings) -> Result<(), Error> {
        self.settings = EmbeddedJson::from_value(settings)?;
        Ok(())
    }

    /// Decode the embedded `streamSettings` document.
    pub fn stream_settings(&self) -> Result<serde_json::Value, Error> {
        self.stream_settings.to_value()
    }

    /// Decode the embedded `sniffing` document.
    pub fn sniffing(&self) -> Result<serde_json::Value, Error> {
        self.sniffing.to_value()
    }

    /// Decode the embedded `allocate` document.
    pub fn allocate(&self) -> Result<serde_json::Value, Error> {
        self.allocate.to_value()
    }

    /// Expiry as a timestamp; `None` when it never expires.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        millis_to_datetime(self.expiry_time)
    }
}

// ── Settings ─────────────────────────────────────────────────────────

/// Decoded form of `Inbound::settings`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    #[serde(deserialize_with = "null_as_default")]
    pub clients: Vec<Client>,
    pub decryption: String,
    /// Opaque fallback entries, passed through untouched.
    #[serde(deserialize_with = "null_as_default")]
    pub fallbacks: Vec<serde_json::Value>,
    /// Protocol-specific keys (`method`, `network`, ...).
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Settings {
    /// The client whose email matches `email` exactly.
    pub fn find_client(&self, email: &str) -> Option<&Client> {
        self.clients.iter().find(|c| c.email == email)
    }
}

// ── Client ───────────────────────────────────────────────────────────

/// A single user attached to an inbound.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Client {
    /// Usually a UUID. Trojan/Shadowsocks clients use `password` (in `extra`) instead.
    pub id: String,
    pub email: String,
    pub enable: bool,
    /// Milliseconds since the epoch. 0 = never, negative = duration counted from first use.
    pub expiry_time: i64,
    /// Traffic cap in bytes, despite the field name. 0 = unlimited.
    #[serde(rename = "totalGB")]
    pub total_gb: i64,
    pub limit_ip: i32,
    pub reset: i32,
    pub sub_id: String,
    pub comment: String,
    pub flow: String,
    /// Telegram chat ID. Older panels send it as a string (often `""`).
    #[serde(deserialize_with = "lenient_i64")]
    pub tg_id: i64,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Client {
    /// A new enabled client with a random UUID.
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: email.into(),
            enable: true,
            ..Self::default()
        }
    }

    /// Expiry as a timestamp; `None` when it never expires.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        millis_to_datetime(self.expiry_time)
    }
}

/// The `settings` payload for `addClient` / `updateClient`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientSettings {
    pub clients: Vec<Client>,
}

impl ClientSettings {
    /// Serialize to the JSON text the panel expects inside the request.
    pub fn to_embedded(&self) -> Result<EmbeddedJson, Error> {
        EmbeddedJson::from_value(self)
    }
}

/// Request body shared by `addClient` and `updateClient/{uuid}`.
#[derive(Debug, Clone, Serialize)]
pub struct ClientSettingsRequest<'a> {
    pub id: i64,
    /// Pre-serialized `{"clients": [...]}` document.
    pub settings: &'a str,
}

// ── Client traffic ───────────────────────────────────────────────────

/// Server-side usage counters for one client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClientTraffic {
    pub id: i64,
    pub inbound_id: i64,
    pub enable: bool,
    pub email: String,
    pub up: i64,
    pub down: i64,
    pub expiry_time: i64,
    pub total: i64,
    pub reset: i64,
}

impl ClientTraffic {
    /// Bytes transferred in both directions.
    pub fn used(&self) -> i64 {
        self.up.saturating_add(self.down)
    }

    /// Expiry as a timestamp; `None` when it never expires.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        millis_to_datetime(self.expiry_time)
    }

    /// Whether the client is out of quota or past its expiry at `now`.
    pub fn is_depleted_at(&self, now: DateTime<Utc>) -> bool {
        let over_quota = self.total > 0 && self.used() >= self.total;
        let expired = self.expires_at().is_some_and(|at| at <= now);
        over_quota || expired
    }

    pub fn is_depleted(&self) -> bool {
        self.is_depleted_at(Utc::now())
    }
}

// ── Helpers ──────────────────────────────────────────────────────────

fn millis_to_datetime(millis: i64) -> Option<DateTime<Utc>> {
    if millis <= 0 {
        return None;
    }
    DateTime::from_timestamp_millis(millis)
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LenientInt {
    Int(i64),
    Text(String),
}

/// Accept `123`, `"123"`, `""` and `null`.
fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<LenientInt>::deserialize(deserializer)? {
        None => Ok(0),
        Some(LenientInt::Int(n)) => Ok(n),
        Some(LenientInt::Text(s)) => {
            let s = s.trim();
            if s.is_empty() {
                Ok(0)
            } else {
                s.parse()
                    .map_err(|_| de::Error::custom(format!("invalid tgId {s:?}")))
            }
        }
    }
}
