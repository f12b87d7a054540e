//! Friendship canonicalization
//!
//! Friendships are undirected; the source may carry `(a, b)`, `(b, a)` or
//! both. Each pair is reordered so the smaller id comes first, then
//! deduplicated, which makes the operation idempotent.

use std::collections::HashSet;

use crate::entities::FriendshipPair;
use crate::source::FriendRecord;

/// Reorder every pair to `(min, max)` and drop duplicates, keeping first-seen
/// order. Self-pairs pass through unchanged.
pub fn canonicalize(friends: &[FriendRecord]) -> Vec<FriendshipPair> {
    let mut seen: HashSet<FriendshipPair> = HashSet::new();
    let mut pairs = Vec::new();

    for record in friends {
        let pair = FriendshipPair {
            friend1: record.friend1.min(record.friend2),
            friend2: record.friend1.max(record.friend2),
        };
        if seen.insert(pair) {
            pairs.push(pair);
        }
    }

    pairs
}
