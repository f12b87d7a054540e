//! Pure derivation stages
//!
//! Each stage takes immutable source slices and returns new output; nothing
//! rewrites a table in place. Stages are ordered by data dependency only and
//! are independently testable.

pub mod behaviors;
pub mod campaigns;
pub mod clients;
pub mod events;
pub mod friends;
pub mod messages;

use tracing::info;

use crate::entities::DerivedModel;
use crate::source::Snapshot;

/// Derive the complete target-agnostic model from one immutable snapshot.
pub fn derive_model(snapshot: &Snapshot) -> DerivedModel {
    let (abstract_messages, messages_sent) = messages::extract_messages(&snapshot.messages);
    info!(
        abstract_messages = abstract_messages.len(),
        messages_sent = messages_sent.len(),
        "message entities derived"
    );

    let message_behaviors = behaviors::extract_behaviors(&snapshot.messages);
    info!(rows = message_behaviors.len(), "behavior long format derived");

    let campaigns = campaigns::filter_and_split(&snapshot.campaigns);
    info!(
        kept = campaigns.len(),
        dropped = snapshot.campaigns.len() - campaigns.len(),
        "campaigns filtered and split"
    );

    let (products, product_cards, events) = events::extract_relational(&snapshot.events);
    let (catalog_products, catalog_events) = events::extract_catalog(&snapshot.events);
    info!(
        products = products.len(),
        product_cards = product_cards.len(),
        events = events.len(),
        catalog_products = catalog_products.len(),
        "product and event entities derived"
    );

    let clients = clients::extract_clients(&snapshot.messages, &snapshot.first_purchases);
    let users = clients::collect_users(
        &snapshot.messages,
        &snapshot.events,
        &snapshot.first_purchases,
        &snapshot.friends,
    );
    info!(clients = clients.len(), users = users.len(), "client and user entities derived");

    let friendships = friends::canonicalize(&snapshot.friends);
    info!(pairs = friendships.len(), "friendships canonicalized");

    DerivedModel {
        abstract_messages,
        messages_sent,
        message_behaviors,
        campaigns,
        clients,
        users,
        products,
        product_cards,
        events,
        catalog_products,
        catalog_events,
        friendships,
    }
}
