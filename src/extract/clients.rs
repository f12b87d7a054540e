//! Client devices and the user universe
//!
//! A client is one device of one user. Clients appear in two places in the
//! source: on every message row and in the first-purchase table. Both feed
//! the same deduplicated device list, with the first-purchase date joined
//! in where one exists.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;

use crate::entities::Client;
use crate::source::{EventRecord, FirstPurchaseRecord, FriendRecord, MessageRecord};

/// Deduplicate client devices by `client_id`, first occurrence wins, message
/// rows scanned before the first-purchase table. The purchase date is a left
/// join: clients without one keep `None`.
pub fn extract_clients(
    messages: &[MessageRecord],
    first_purchases: &[FirstPurchaseRecord],
) -> Vec<Client> {
    let mut purchase_dates: HashMap<i64, NaiveDate> = HashMap::new();
    for record in first_purchases {
        if let Some(date) = record.first_purchase_date {
            purchase_dates.entry(record.client_id).or_insert(date);
        }
    }

    let mut seen: HashSet<i64> = HashSet::new();
    let mut clients = Vec::new();

    for record in messages {
        if seen.insert(record.client_id) {
            clients.push(Client {
                client_id: record.client_id,
                user_id: record.user_id,
                user_device_id: record.user_device_id,
                first_purchase_date: purchase_dates.get(&record.client_id).copied(),
            });
        }
    }
    for record in first_purchases {
        if seen.insert(record.client_id) {
            clients.push(Client {
                client_id: record.client_id,
                user_id: record.user_id,
                user_device_id: record.user_device_id,
                first_purchase_date: purchase_dates.get(&record.client_id).copied(),
            });
        }
    }

    clients
}

/// The user universe: every user id observed anywhere in the snapshot, in
/// first-seen order across messages, events, first purchases and both sides
/// of each friendship row.
pub fn collect_users(
    messages: &[MessageRecord],
    events: &[EventRecord],
    first_purchases: &[FirstPurchaseRecord],
    friends: &[FriendRecord],
) -> Vec<i64> {
    let mut seen: HashSet<i64> = HashSet::new();
    let mut users = Vec::new();
    let mut push = |id: i64, seen: &mut HashSet<i64>, users: &mut Vec<i64>| {
        if seen.insert(id) {
            users.push(id);
        }
    };

    for record in messages {
        push(record.user_id, &mut seen, &mut users);
    }
    for record in events {
        push(record.user_id, &mut seen, &mut users);
    }
    for record in first_purchases {
        push(record.user_id, &mut seen, &mut users);
    }
    for record in friends {
        push(record.friend1, &mut seen, &mut users);
        push(record.friend2, &mut seen, &mut users);
    }

    users
}
