//! Document projection
//!
//! Denormalizes the derived model into JSON collections. Optional attributes
//! and failed sub-detail memberships are omitted keys, never `null`;
//! embedded arrays are always present, possibly empty. Messages re-inline
//! their abstract tuple through an inner join, so a sent fact whose abstract
//! key is missing is dropped rather than half-filled.

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::entities::{
    CampaignBulkDetails, CampaignSubjectDetails, CampaignTriggerDetails, CatalogEvent,
    CatalogProduct, DerivedModel, FriendshipPair,
};

/// One embedded behavior of a message document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BehaviorDoc {
    pub behavior_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_time_at: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_time_at: Option<NaiveDateTime>,
}

/// One message document with its abstract tuple re-inlined and behaviors
/// embedded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageDoc {
    pub message_id: String,
    pub campaign_id: i64,
    pub message_type: String,
    pub channel: String,
    pub client_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sent_at: Option<NaiveDateTime>,
    pub behaviors: Vec<BehaviorDoc>,
}

/// One campaign document; sub-detail keys exist only for members.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignDoc {
    pub id: i64,
    pub campaign_type: String,
    pub channel: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bulk_details: Option<CampaignBulkDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger_details: Option<CampaignTriggerDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_details: Option<CampaignSubjectDetails>,
}

/// One device entry embedded in a user document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceDoc {
    pub client_id: i64,
    pub client_device_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_purchase_date: Option<NaiveDate>,
}

/// One user document with its devices embedded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserDoc {
    pub user_id: i64,
    pub devices: Vec<DeviceDoc>,
}

/// The complete document collection set, each field one output JSON file.
#[derive(Debug, Default)]
pub struct DocumentTarget {
    pub messages: Vec<MessageDoc>,
    pub campaigns: Vec<CampaignDoc>,
    pub users: Vec<UserDoc>,
    pub products: Vec<CatalogProduct>,
    pub events: Vec<CatalogEvent>,
    pub friends: Vec<FriendshipPair>,
}

/// Project the derived model into the document collection set.
pub fn project_document(model: &DerivedModel) -> DocumentTarget {
    let abstracts: HashMap<i64, &crate::entities::AbstractMessage> = model
        .abstract_messages
        .iter()
        .map(|abs| (abs.id, abs))
        .collect();

    let mut behaviors: HashMap<&str, Vec<BehaviorDoc>> = HashMap::new();
    for behavior in &model.message_behaviors {
        behaviors
            .entry(behavior.message_id.as_str())
            .or_default()
            .push(BehaviorDoc {
                behavior_type: behavior.behavior_type,
                first_time_at: behavior.happened_first_time,
                last_time_at: behavior.happened_last_time,
            });
    }

    let messages = model
        .messages_sent
        .iter()
        .filter_map(|sent| {
            let abs = abstracts.get(&sent.abstract_message_id)?;
            Some(MessageDoc {
                message_id: sent.message_id.clone(),
                campaign_id: abs.campaign_id,
                message_type: abs.message_type.clone(),
                channel: abs.channel.clone(),
                client_id: sent.client_id,
                email_provider: sent.email_provider.clone(),
                platform: sent.platform.clone(),
                created_at: sent.created_at,
                updated_at: sent.updated_at,
                sent_at: sent.sent_at,
                behaviors: behaviors
                    .get(sent.message_id.as_str())
                    .cloned()
                    .unwrap_or_default(),
            })
        })
        .collect();

    let campaigns = model
        .campaigns
        .iter()
        .map(|campaign| CampaignDoc {
            id: campaign.campaign_pk,
            campaign_type: campaign.campaign_type.clone(),
            channel: campaign.channel.clone(),
            topic: campaign.topic.clone(),
            bulk_details: campaign.bulk_details.clone(),
            trigger_details: campaign.trigger_details.clone(),
            subject_details: campaign.subject_details.clone(),
        })
        .collect();

    let mut devices: HashMap<i64, Vec<DeviceDoc>> = HashMap::new();
    for client in &model.clients {
        devices.entry(client.user_id).or_default().push(DeviceDoc {
            client_id: client.client_id,
            client_device_id: client.user_device_id,
            first_purchase_date: client.first_purchase_date,
        });
    }
    let users = model
        .users
        .iter()
        .map(|&user_id| UserDoc {
            user_id,
            devices: devices.remove(&user_id).unwrap_or_default(),
        })
        .collect();

    DocumentTarget {
        messages,
        campaigns,
        users,
        products: model.catalog_products.clone(),
        events: model.catalog_events.clone(),
        friends: model.friendships.clone(),
    }
}
