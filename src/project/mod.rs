//! Target projections
//!
//! The derived model is projected into three independent persistence shapes:
//! normalized relational tables, denormalized document collections, and a
//! bulk-import property graph. Projections read the model, never mutate it,
//! and can be regenerated from the same model in any order.

pub mod document;
pub mod graph;
pub mod relational;

use tracing::info;

use crate::entities::DerivedModel;

pub use document::DocumentTarget;
pub use graph::GraphTarget;
pub use relational::RelationalTarget;

/// All three targets of one run.
#[derive(Debug)]
pub struct Targets {
    pub relational: RelationalTarget,
    pub document: DocumentTarget,
    pub graph: GraphTarget,
}

/// Project the derived model into every target.
pub fn project_all(model: &DerivedModel) -> Targets {
    let relational = relational::project_relational(model);
    info!(
        messages = relational.messages.len(),
        campaigns = relational.campaigns.len(),
        events = relational.events.len(),
        "relational target projected"
    );

    let document = document::project_document(model);
    info!(
        messages = document.messages.len(),
        campaigns = document.campaigns.len(),
        users = document.users.len(),
        "document target projected"
    );

    let graph = graph::project_graph(model);
    info!(
        node_files = graph.nodes.len(),
        edge_files = graph.edges.len(),
        "graph target projected"
    );

    Targets {
        relational,
        document,
        graph,
    }
}
