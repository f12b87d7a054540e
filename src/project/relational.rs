//! Relational projection
//!
//! Flattens the derived model into the normalized table set. Campaign
//! sub-details become their own tables keyed by `campaign_pk`; everything
//! else maps one entity to one row.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::entities::{
    AbstractMessage, Client, DerivedModel, EventFact, FriendshipPair, MessageBehavior,
    MessageSent, Product, ProductCard,
};

/// One row of the `campaigns` base table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignRow {
    pub campaign_pk: i64,
    pub campaign_type: String,
    pub channel: String,
    pub topic: Option<String>,
}

/// One row of the `campaign_bulks` sub-table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignBulkRow {
    pub campaign_pk: i64,
    pub started_at: NaiveDateTime,
    pub finished_at: Option<NaiveDateTime>,
    pub total_count: Option<i64>,
    pub warmup_mode: bool,
    pub hour_limit: Option<i64>,
    pub ab_test: bool,
}

/// One row of the `campaign_triggers` sub-table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignTriggerRow {
    pub campaign_pk: i64,
    pub position: i64,
}

/// One row of the `campaign_subjects` sub-table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignSubjectRow {
    pub campaign_pk: i64,
    pub subject_length: Option<i64>,
    pub subject_with_personalization: Option<bool>,
    pub subject_with_deadline: Option<bool>,
    pub subject_with_emoji: Option<bool>,
    pub subject_with_bonuses: Option<bool>,
    pub subject_with_discount: Option<bool>,
    pub subject_with_saleout: Option<bool>,
}

/// One row of the `users` table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserRow {
    pub user_id: i64,
}

/// The complete relational table set, each field one output CSV table.
#[derive(Debug, Default)]
pub struct RelationalTarget {
    pub messages: Vec<AbstractMessage>,
    pub message_sent: Vec<MessageSent>,
    pub message_behavior: Vec<MessageBehavior>,
    pub campaigns: Vec<CampaignRow>,
    pub campaign_bulks: Vec<CampaignBulkRow>,
    pub campaign_triggers: Vec<CampaignTriggerRow>,
    pub campaign_subjects: Vec<CampaignSubjectRow>,
    pub products: Vec<Product>,
    pub product_cards: Vec<ProductCard>,
    pub events: Vec<EventFact>,
    pub clients: Vec<Client>,
    pub users: Vec<UserRow>,
    pub friends: Vec<FriendshipPair>,
}

/// Project the derived model into the relational table set.
pub fn project_relational(model: &DerivedModel) -> RelationalTarget {
    let mut target = RelationalTarget {
        messages: model.abstract_messages.clone(),
        message_sent: model.messages_sent.clone(),
        message_behavior: model.message_behaviors.clone(),
        products: model.products.clone(),
        product_cards: model.product_cards.clone(),
        events: model.events.clone(),
        clients: model.clients.clone(),
        users: model.users.iter().map(|&user_id| UserRow { user_id }).collect(),
        friends: model.friendships.clone(),
        ..RelationalTarget::default()
    };

    for campaign in &model.campaigns {
        target.campaigns.push(CampaignRow {
            campaign_pk: campaign.campaign_pk,
            campaign_type: campaign.campaign_type.clone(),
            channel: campaign.channel.clone(),
            topic: campaign.topic.clone(),
        });
        if let Some(details) = &campaign.bulk_details {
            target.campaign_bulks.push(CampaignBulkRow {
                campaign_pk: campaign.campaign_pk,
                started_at: details.started_at,
                finished_at: details.finished_at,
                total_count: details.total_count,
                warmup_mode: details.warmup_mode,
                hour_limit: details.hour_limit,
                ab_test: details.ab_test,
            });
        }
        if let Some(details) = &campaign.trigger_details {
            target.campaign_triggers.push(CampaignTriggerRow {
                campaign_pk: campaign.campaign_pk,
                position: details.position,
            });
        }
        if let Some(details) = &campaign.subject_details {
            target.campaign_subjects.push(CampaignSubjectRow {
                campaign_pk: campaign.campaign_pk,
                subject_length: details.subject_length,
                subject_with_personalization: details.subject_with_personalization,
                subject_with_deadline: details.subject_with_deadline,
                subject_with_emoji: details.subject_with_emoji,
                subject_with_bonuses: details.subject_with_bonuses,
                subject_with_discount: details.subject_with_discount,
                subject_with_saleout: details.subject_with_saleout,
            });
        }
    }

    target
}
