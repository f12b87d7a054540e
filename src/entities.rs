//! Derived target-agnostic entities
//!
//! Everything here is produced fresh per run by the extraction stages and
//! consumed by the three projections. Sub-details on [`Campaign`] are
//! optional struct fields, not nullable columns: present-vs-absent stays
//! visible in the type system so the document projection can omit keys
//! instead of writing nulls.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

/// Surrogate-keyed grouping of messages sharing
/// `(campaign_id, message_type, channel)`. Keys are 1-based and assigned in
/// first-seen order; they are stable within a run, not across runs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AbstractMessage {
    pub id: i64,
    pub campaign_id: i64,
    pub message_type: String,
    pub channel: String,
}

/// Per-message sent fact, keyed by the natural `message_id`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageSent {
    pub message_id: String,
    pub abstract_message_id: i64,
    pub client_id: i64,
    pub email_provider: Option<String>,
    pub platform: Option<String>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
    pub sent_at: Option<NaiveDateTime>,
}

/// Long-format behavior fact. At most one row per
/// `(message_id, behavior_type)` pair by construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageBehavior {
    pub message_id: String,
    pub behavior_type: &'static str,
    pub happened_first_time: Option<NaiveDateTime>,
    pub happened_last_time: Option<NaiveDateTime>,
}

/// Surviving campaign with its conditional sub-details.
/// `campaign_pk` is the 0-based source row position.
#[derive(Debug, Clone, PartialEq)]
pub struct Campaign {
    pub campaign_pk: i64,
    pub campaign_type: String,
    pub channel: String,
    pub topic: Option<String>,
    pub bulk_details: Option<CampaignBulkDetails>,
    pub trigger_details: Option<CampaignTriggerDetails>,
    pub subject_details: Option<CampaignSubjectDetails>,
}

/// Bulk-only attributes. `started_at` is guaranteed by the exclusion filter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignBulkDetails {
    pub started_at: NaiveDateTime,
    pub finished_at: Option<NaiveDateTime>,
    pub total_count: Option<i64>,
    pub warmup_mode: bool,
    pub hour_limit: Option<i64>,
    pub ab_test: bool,
}

/// Trigger-only attributes. `position` is guaranteed by the exclusion filter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignTriggerDetails {
    pub position: i64,
}

/// Subject-line attributes for channels that carry a subject.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignSubjectDetails {
    pub subject_length: Option<i64>,
    pub subject_with_personalization: Option<bool>,
    pub subject_with_deadline: Option<bool>,
    pub subject_with_emoji: Option<bool>,
    pub subject_with_bonuses: Option<bool>,
    pub subject_with_discount: Option<bool>,
    pub subject_with_saleout: Option<bool>,
}

/// Client device, deduplicated by `client_id` (first occurrence wins), with
/// the first-purchase date left-joined in where one exists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Client {
    pub client_id: i64,
    pub user_id: i64,
    pub user_device_id: i64,
    pub first_purchase_date: Option<NaiveDate>,
}

/// Relational-grain product: distinct `(product_id, category_id)` with the
/// mode-aggregated `category_code`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    pub product_pk: i64,
    pub product_id: i64,
    pub category_id: i64,
    pub category_code: Option<String>,
}

/// Product-to-brand link, relational target only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductCard {
    pub product_card_pk: i64,
    pub product_pk: i64,
    pub brand: Option<String>,
}

/// Relational-grain event fact, deduplicated by
/// `(product_card_pk, user_id, event_time)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventFact {
    pub product_card_pk: i64,
    pub user_id: i64,
    pub event_time: Option<NaiveDateTime>,
    pub event_type: String,
    pub user_session: Option<String>,
    pub price: f64,
}

/// Catalog-grain product for the document/graph targets: distinct
/// `(product_id, brand, category_id)`, keeping the first-seen
/// `category_code`. The grain deliberately differs from [`Product`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogProduct {
    pub product_pk: i64,
    pub product_id: i64,
    pub brand: Option<String>,
    pub category_id: i64,
    pub category_code: Option<String>,
}

/// Catalog-grain event fact for the document/graph targets, deduplicated by
/// `(product_pk, user_id, event_time)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogEvent {
    pub product_pk: i64,
    pub user_id: i64,
    pub event_time: Option<NaiveDateTime>,
    pub event_type: String,
    pub user_session: Option<String>,
    pub price: f64,
}

/// Canonicalized undirected friendship: `friend1 <= friend2` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct FriendshipPair {
    pub friend1: i64,
    pub friend2: i64,
}

/// The complete derived model: everything the projections consume.
#[derive(Debug, Clone, Default)]
pub struct DerivedModel {
    pub abstract_messages: Vec<AbstractMessage>,
    pub messages_sent: Vec<MessageSent>,
    pub message_behaviors: Vec<MessageBehavior>,
    pub campaigns: Vec<Campaign>,
    pub clients: Vec<Client>,
    pub users: Vec<i64>,
    pub products: Vec<Product>,
    pub product_cards: Vec<ProductCard>,
    pub events: Vec<EventFact>,
    pub catalog_products: Vec<CatalogProduct>,
    pub catalog_events: Vec<CatalogEvent>,
    pub friendships: Vec<FriendshipPair>,
}
