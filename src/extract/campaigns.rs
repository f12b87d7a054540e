//! Campaign filtering and sub-schema splitting
//!
//! A campaign row is first tested against the exclusion business rule, then
//! survivors split into a base record plus independent conditional
//! memberships: bulk details iff the campaign is bulk, trigger details iff
//! trigger, subject details iff the channel carries a subject line.

use crate::entities::{
    Campaign, CampaignBulkDetails, CampaignSubjectDetails, CampaignTriggerDetails,
};
use crate::source::CampaignRecord;

/// Channels whose campaigns have no subject line.
pub const CHANNELS_WITHOUT_SUBJECT: &[&str] = &["sms", "multichannel"];

/// Exclusion rule, a pure function of the record:
/// test campaigns, bulk campaigns that never started, bulk campaigns in
/// warmup mode without an hour limit, and trigger campaigns without a
/// position are all dropped from every downstream derivation.
pub fn is_excluded(record: &CampaignRecord) -> bool {
    if record.is_test {
        return true;
    }
    if record.campaign_type == "bulk"
        && (record.started_at.is_none() || (record.warmup_mode && record.hour_limit.is_none()))
    {
        return true;
    }
    record.campaign_type == "trigger" && record.position.is_none()
}

/// Filter campaigns and split survivors into base plus sub-details.
/// `campaign_pk` is the 0-based source row position, so surviving campaigns
/// keep their original identity after exclusion.
pub fn filter_and_split(records: &[CampaignRecord]) -> Vec<Campaign> {
    records
        .iter()
        .enumerate()
        .filter(|(_, record)| !is_excluded(record))
        .map(|(position, record)| split_one(position as i64, record))
        .collect()
}

fn split_one(campaign_pk: i64, record: &CampaignRecord) -> Campaign {
    let bulk_details = match (record.campaign_type.as_str(), record.started_at) {
        ("bulk", Some(started_at)) => Some(CampaignBulkDetails {
            started_at,
            finished_at: record.finished_at,
            total_count: record.total_count,
            warmup_mode: record.warmup_mode,
            hour_limit: record.hour_limit,
            ab_test: record.ab_test,
        }),
        _ => None,
    };

    let trigger_details = match (record.campaign_type.as_str(), record.position) {
        ("trigger", Some(position)) => Some(CampaignTriggerDetails { position }),
        _ => None,
    };

    let subject_details = if CHANNELS_WITHOUT_SUBJECT.contains(&record.channel.as_str()) {
        None
    } else {
        Some(CampaignSubjectDetails {
            subject_length: record.subject_length,
            subject_with_personalization: record.subject_with_personalization,
            subject_with_deadline: record.subject_with_deadline,
            subject_with_emoji: record.subject_with_emoji,
            subject_with_bonuses: record.subject_with_bonuses,
            subject_with_discount: record.subject_with_discount,
            subject_with_saleout: record.subject_with_saleout,
        })
    };

    Campaign {
        campaign_pk,
        campaign_type: record.campaign_type.clone(),
        channel: record.channel.clone(),
        topic: record.topic.clone(),
        bulk_details,
        trigger_details,
        subject_details,
    }
}
