//! Typed source records
//!
//! The pipeline consumes already-typed tabular rows; these structs are the
//! shape of data crossing that boundary. Optional columns are `Option<T>`,
//! timestamps are naive (the source carries no zone information).
//!
//! Behavior types are declared statically in [`BEHAVIOR_SPECS`] instead of
//! being rediscovered from an `is_` column-name convention: adding a behavior
//! is a table change here, not a naming contract the loader must honor.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;

/// One immutable source snapshot. Every run derives all outputs from a full
/// snapshot; there is no incremental update path.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub messages: Vec<MessageRecord>,
    pub campaigns: Vec<CampaignRecord>,
    pub events: Vec<EventRecord>,
    pub first_purchases: Vec<FirstPurchaseRecord>,
    pub friends: Vec<FriendRecord>,
}

/// One row of the raw messages table.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageRecord {
    pub message_id: String,
    pub campaign_id: i64,
    pub message_type: String,
    pub channel: String,
    pub platform: Option<String>,
    pub email_provider: Option<String>,
    pub user_device_id: i64,
    pub user_id: i64,
    pub client_id: i64,

    #[serde(deserialize_with = "de::bool_flag")]
    pub is_clicked: bool,
    #[serde(deserialize_with = "de::bool_flag")]
    pub is_opened: bool,
    #[serde(deserialize_with = "de::bool_flag")]
    pub is_unsubscribed: bool,
    #[serde(deserialize_with = "de::bool_flag")]
    pub is_hard_bounced: bool,
    #[serde(deserialize_with = "de::bool_flag")]
    pub is_soft_bounced: bool,
    #[serde(deserialize_with = "de::bool_flag")]
    pub is_complained: bool,
    #[serde(deserialize_with = "de::bool_flag")]
    pub is_purchased: bool,
    #[serde(deserialize_with = "de::bool_flag")]
    pub is_blocked: bool,

    #[serde(deserialize_with = "de::opt_message_ts")]
    pub clicked_first_time_at: Option<NaiveDateTime>,
    #[serde(deserialize_with = "de::opt_message_ts")]
    pub clicked_last_time_at: Option<NaiveDateTime>,
    #[serde(deserialize_with = "de::opt_message_ts")]
    pub opened_first_time_at: Option<NaiveDateTime>,
    #[serde(deserialize_with = "de::opt_message_ts")]
    pub opened_last_time_at: Option<NaiveDateTime>,
    #[serde(deserialize_with = "de::opt_message_ts")]
    pub unsubscribed_at: Option<NaiveDateTime>,
    #[serde(deserialize_with = "de::opt_message_ts")]
    pub hard_bounced_at: Option<NaiveDateTime>,
    #[serde(deserialize_with = "de::opt_message_ts")]
    pub soft_bounced_at: Option<NaiveDateTime>,
    #[serde(deserialize_with = "de::opt_message_ts")]
    pub complained_at: Option<NaiveDateTime>,
    #[serde(deserialize_with = "de::opt_message_ts")]
    pub purchased_at: Option<NaiveDateTime>,
    #[serde(deserialize_with = "de::opt_message_ts")]
    pub blocked_at: Option<NaiveDateTime>,

    #[serde(deserialize_with = "de::opt_message_ts")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(deserialize_with = "de::opt_message_ts")]
    pub updated_at: Option<NaiveDateTime>,
    #[serde(deserialize_with = "de::opt_message_ts")]
    pub sent_at: Option<NaiveDateTime>,
}

/// One row of the raw campaigns table. `is_test`, `ab_test` and
/// `warmup_mode` default to false when the source value is missing.
#[derive(Debug, Clone, Deserialize)]
pub struct CampaignRecord {
    pub campaign_type: String,
    pub channel: String,
    pub topic: Option<String>,
    pub total_count: Option<i64>,
    #[serde(deserialize_with = "de::bool_flag")]
    pub ab_test: bool,
    #[serde(deserialize_with = "de::bool_flag")]
    pub warmup_mode: bool,
    #[serde(deserialize_with = "de::bool_flag")]
    pub is_test: bool,
    pub hour_limit: Option<i64>,
    pub subject_length: Option<i64>,
    #[serde(deserialize_with = "de::opt_bool_flag")]
    pub subject_with_personalization: Option<bool>,
    #[serde(deserialize_with = "de::opt_bool_flag")]
    pub subject_with_deadline: Option<bool>,
    #[serde(deserialize_with = "de::opt_bool_flag")]
    pub subject_with_emoji: Option<bool>,
    #[serde(deserialize_with = "de::opt_bool_flag")]
    pub subject_with_bonuses: Option<bool>,
    #[serde(deserialize_with = "de::opt_bool_flag")]
    pub subject_with_discount: Option<bool>,
    #[serde(deserialize_with = "de::opt_bool_flag")]
    pub subject_with_saleout: Option<bool>,
    pub position: Option<i64>,
    #[serde(deserialize_with = "de::opt_message_ts")]
    pub started_at: Option<NaiveDateTime>,
    #[serde(deserialize_with = "de::opt_message_ts")]
    pub finished_at: Option<NaiveDateTime>,
}

/// One row of the raw events table.
#[derive(Debug, Clone, Deserialize)]
pub struct EventRecord {
    #[serde(deserialize_with = "de::opt_event_ts")]
    pub event_time: Option<NaiveDateTime>,
    pub event_type: String,
    pub product_id: i64,
    pub category_id: i64,
    pub category_code: Option<String>,
    pub brand: Option<String>,
    pub price: f64,
    pub user_id: i64,
    pub user_session: Option<String>,
}

/// One row of the client-first-purchase table.
#[derive(Debug, Clone, Deserialize)]
pub struct FirstPurchaseRecord {
    pub client_id: i64,
    pub user_id: i64,
    pub user_device_id: i64,
    #[serde(deserialize_with = "de::opt_date")]
    pub first_purchase_date: Option<NaiveDate>,
}

/// One row of the raw friends table. Unordered pair of user ids.
#[derive(Debug, Clone, Deserialize)]
pub struct FriendRecord {
    pub friend1: i64,
    pub friend2: i64,
}

/// Statically declared behavior descriptor: the flag column plus its
/// first/last timestamp accessors.
pub struct BehaviorSpec {
    pub name: &'static str,
    pub flag: fn(&MessageRecord) -> bool,
    pub first_time: fn(&MessageRecord) -> Option<NaiveDateTime>,
    pub last_time: fn(&MessageRecord) -> Option<NaiveDateTime>,
}

/// Behavior catalogue for the messages table.
///
/// `clicked` and `opened` carry explicit first/last columns; the remaining
/// behaviors have a single `<behavior>_at` column which stands in for the
/// first-time value and no last-time value at all.
pub const BEHAVIOR_SPECS: &[BehaviorSpec] = &[
    BehaviorSpec {
        name: "clicked",
        flag: |m| m.is_clicked,
        first_time: |m| m.clicked_first_time_at,
        last_time: |m| m.clicked_last_time_at,
    },
    BehaviorSpec {
        name: "opened",
        flag: |m| m.is_opened,
        first_time: |m| m.opened_first_time_at,
        last_time: |m| m.opened_last_time_at,
    },
    BehaviorSpec {
        name: "unsubscribed",
        flag: |m| m.is_unsubscribed,
        first_time: |m| m.unsubscribed_at,
        last_time: |_| None,
    },
    BehaviorSpec {
        name: "hard_bounced",
        flag: |m| m.is_hard_bounced,
        first_time: |m| m.hard_bounced_at,
        last_time: |_| None,
    },
    BehaviorSpec {
        name: "soft_bounced",
        flag: |m| m.is_soft_bounced,
        first_time: |m| m.soft_bounced_at,
        last_time: |_| None,
    },
    BehaviorSpec {
        name: "complained",
        flag: |m| m.is_complained,
        first_time: |m| m.complained_at,
        last_time: |_| None,
    },
    BehaviorSpec {
        name: "purchased",
        flag: |m| m.is_purchased,
        first_time: |m| m.purchased_at,
        last_time: |_| None,
    },
    BehaviorSpec {
        name: "blocked",
        flag: |m| m.is_blocked,
        first_time: |m| m.blocked_at,
        last_time: |_| None,
    },
];

/// Field-level deserializers for the source CSV dialect: `t`/`f` booleans
/// and the three timestamp formats the raw exports use.
pub(crate) mod de {
    use chrono::{NaiveDate, NaiveDateTime};
    use serde::{Deserialize, Deserializer};

    const MESSAGE_TS_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];
    const EVENT_TS_FORMATS: &[&str] = &[
        "%Y-%m-%d %H:%M:%S UTC",
        "%Y-%m-%d %H:%M:%S%.f UTC",
        "%Y-%m-%d %H:%M:%S%.f",
    ];

    fn parse_bool(raw: &str) -> Option<bool> {
        match raw {
            "t" | "true" | "True" | "1" => Some(true),
            "f" | "false" | "False" | "0" => Some(false),
            _ => None,
        }
    }

    fn parse_ts(raw: &str, formats: &[&str]) -> Option<NaiveDateTime> {
        formats
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
    }

    /// Boolean flag column; an empty value means false.
    pub fn bool_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(false);
        }
        parse_bool(raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid boolean flag: {raw:?}")))
    }

    /// Nullable boolean column; an empty value stays absent.
    pub fn opt_bool_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        parse_bool(raw)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid boolean value: {raw:?}")))
    }

    /// Nullable timestamp in the messages/campaigns export format.
    pub fn opt_message_ts<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        opt_ts(deserializer, MESSAGE_TS_FORMATS)
    }

    /// Nullable timestamp in the events export format (`... UTC` suffix).
    pub fn opt_event_ts<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        opt_ts(deserializer, EVENT_TS_FORMATS)
    }

    fn opt_ts<'de, D>(deserializer: D, formats: &[&str]) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        parse_ts(raw, formats)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("unparseable timestamp: {raw:?}")))
    }

    /// Nullable calendar date (`YYYY-MM-DD`).
    pub fn opt_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("unparseable date: {raw:?}")))
    }
}
