//! Shared record builders for unit tests.

use chrono::{NaiveDate, NaiveDateTime};

use crate::source::{CampaignRecord, EventRecord, MessageRecord};

pub fn ts(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, mo, d)
        .unwrap()
        .and_hms_opt(h, mi, s)
        .unwrap()
}

pub fn message(
    message_id: &str,
    campaign_id: i64,
    message_type: &str,
    channel: &str,
) -> MessageRecord {
    MessageRecord {
        message_id: message_id.to_string(),
        campaign_id,
        message_type: message_type.to_string(),
        channel: channel.to_string(),
        platform: None,
        email_provider: None,
        user_device_id: 1,
        user_id: 1,
        client_id: 1,
        is_clicked: false,
        is_opened: false,
        is_unsubscribed: false,
        is_hard_bounced: false,
        is_soft_bounced: false,
        is_complained: false,
        is_purchased: false,
        is_blocked: false,
        clicked_first_time_at: None,
        clicked_last_time_at: None,
        opened_first_time_at: None,
        opened_last_time_at: None,
        unsubscribed_at: None,
        hard_bounced_at: None,
        soft_bounced_at: None,
        complained_at: None,
        purchased_at: None,
        blocked_at: None,
        created_at: None,
        updated_at: None,
        sent_at: None,
    }
}

pub fn campaign(campaign_type: &str, channel: &str) -> CampaignRecord {
    CampaignRecord {
        campaign_type: campaign_type.to_string(),
        channel: channel.to_string(),
        topic: None,
        total_count: None,
        ab_test: false,
        warmup_mode: false,
        is_test: false,
        hour_limit: None,
        subject_length: None,
        subject_with_personalization: None,
        subject_with_deadline: None,
        subject_with_emoji: None,
        subject_with_bonuses: None,
        subject_with_discount: None,
        subject_with_saleout: None,
        position: None,
        started_at: None,
        finished_at: None,
    }
}

pub fn event(
    product_id: i64,
    category_id: i64,
    category_code: Option<&str>,
    brand: Option<&str>,
) -> EventRecord {
    EventRecord {
        event_time: Some(ts(2020, 4, 1, 10, 0, 0)),
        event_type: "view".to_string(),
        product_id,
        category_id,
        category_code: category_code.map(str::to_string),
        brand: brand.map(str::to_string),
        price: 10.0,
        user_id: 1,
        user_session: Some("s-1".to_string()),
    }
}
