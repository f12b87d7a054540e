//! Abstract message keying and per-message sent facts.

use std::collections::{HashMap, HashSet};

use crate::entities::{AbstractMessage, MessageSent};
use crate::source::MessageRecord;

/// Assign 1-based surrogate ids to each distinct
/// `(campaign_id, message_type, channel)` tuple in first-seen order, and
/// project every message against its surrogate. Duplicate `message_id` rows
/// are dropped (first occurrence wins).
///
/// Assignment is deterministic for a fixed input row order; a reordered
/// input may assign different surrogates.
pub fn extract_messages(messages: &[MessageRecord]) -> (Vec<AbstractMessage>, Vec<MessageSent>) {
    let mut key_index: HashMap<(i64, String, String), i64> = HashMap::new();
    let mut seen_messages: HashSet<&str> = HashSet::new();
    let mut abstract_messages = Vec::new();
    let mut sent = Vec::with_capacity(messages.len());

    for record in messages {
        if !seen_messages.insert(record.message_id.as_str()) {
            continue;
        }
        let key = (
            record.campaign_id,
            record.message_type.clone(),
            record.channel.clone(),
        );
        let next_id = key_index.len() as i64 + 1;
        let id = *key_index.entry(key).or_insert_with(|| {
            abstract_messages.push(AbstractMessage {
                id: next_id,
                campaign_id: record.campaign_id,
                message_type: record.message_type.clone(),
                channel: record.channel.clone(),
            });
            next_id
        });
        sent.push(MessageSent {
            message_id: record.message_id.clone(),
            abstract_message_id: id,
            client_id: record.client_id,
            email_provider: record.email_provider.clone(),
            platform: record.platform.clone(),
            created_at: record.created_at,
            updated_at: record.updated_at,
            sent_at: record.sent_at,
        });
    }

    (abstract_messages, sent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::message;

    #[test]
    fn same_tuple_shares_one_surrogate() {
        let rows = vec![
            message("m-1", 1, "promo", "email"),
            message("m-2", 1, "promo", "email"),
        ];
        let (abstracts, sent) = extract_messages(&rows);
        assert_eq!(abstracts.len(), 1);
        assert_eq!(sent[0].abstract_message_id, sent[1].abstract_message_id);
    }

    #[test]
    fn tuples_differing_in_channel_get_distinct_surrogates() {
        // Two email rows plus one sms row: exactly two abstract messages.
        let rows = vec![
            message("m-1", 1, "promo", "email"),
            message("m-2", 1, "promo", "email"),
            message("m-3", 1, "promo", "sms"),
        ];
        let (abstracts, sent) = extract_messages(&rows);
        assert_eq!(abstracts.len(), 2);
        assert_eq!(sent[0].abstract_message_id, 1);
        assert_eq!(sent[1].abstract_message_id, 1);
        assert_eq!(sent[2].abstract_message_id, 2);
    }

    #[test]
    fn surrogates_are_assigned_in_first_seen_order() {
        let rows = vec![
            message("m-1", 9, "trigger", "mobile_push"),
            message("m-2", 1, "promo", "email"),
            message("m-3", 9, "trigger", "mobile_push"),
        ];
        let (abstracts, _) = extract_messages(&rows);
        assert_eq!(abstracts[0].id, 1);
        assert_eq!(abstracts[0].campaign_id, 9);
        assert_eq!(abstracts[1].id, 2);
        assert_eq!(abstracts[1].campaign_id, 1);
    }

    #[test]
    fn duplicate_message_ids_keep_first_occurrence() {
        let mut second = message("m-1", 2, "promo", "email");
        second.client_id = 99;
        let rows = vec![message("m-1", 1, "promo", "email"), second];
        let (abstracts, sent) = extract_messages(&rows);
        assert_eq!(sent.len(), 1);
        assert_eq!(abstracts.len(), 1);
        assert_eq!(abstracts[0].campaign_id, 1);
        assert_eq!(sent[0].client_id, 1);
    }
}
