//! Behavior long-formatter
//!
//! Pivots the wide per-message flag/timestamp columns into one
//! `(message_id, behavior_type, happened_first_time, happened_last_time)`
//! relation, driven by the static [`BEHAVIOR_SPECS`] table.

use std::cmp::Ordering;
use std::collections::HashSet;

use chrono::NaiveDateTime;

use crate::entities::MessageBehavior;
use crate::source::{MessageRecord, BEHAVIOR_SPECS};

/// Extract the long-format behavior relation. A behavior row exists only
/// when its flag was true; output is sorted by
/// `(message_id, happened_first_time)` ascending with absent timestamps
/// last. Each behavior type contributes at most one row per message, so no
/// `(message_id, behavior_type)` pair can repeat.
pub fn extract_behaviors(messages: &[MessageRecord]) -> Vec<MessageBehavior> {
    let mut seen: HashSet<&str> = HashSet::new();
    let unique: Vec<&MessageRecord> = messages
        .iter()
        .filter(|record| seen.insert(record.message_id.as_str()))
        .collect();

    let mut rows = Vec::new();
    for spec in BEHAVIOR_SPECS {
        for record in &unique {
            if (spec.flag)(record) {
                rows.push(MessageBehavior {
                    message_id: record.message_id.clone(),
                    behavior_type: spec.name,
                    happened_first_time: (spec.first_time)(record),
                    happened_last_time: (spec.last_time)(record),
                });
            }
        }
    }

    rows.sort_by(|a, b| {
        a.message_id
            .cmp(&b.message_id)
            .then_with(|| cmp_nulls_last(a.happened_first_time, b.happened_first_time))
    });
    rows
}

fn cmp_nulls_last(a: Option<NaiveDateTime>, b: Option<NaiveDateTime>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
