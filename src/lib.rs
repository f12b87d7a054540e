//! polystore-etl
//!
//! Batch transformation of flat marketing/e-commerce exports into three
//! persistence models: a normalized relational schema, a denormalized
//! document schema, and a labeled-property-graph bulk-import schema. A
//! companion benchmark harness times a fixed analytical query against live
//! database backends.
//!
//! The pipeline is a sequence of pure derivation stages over one immutable
//! source snapshot; the three projections then shape the derived model for
//! each store, and the writers emit the physical files.

pub mod bench;
pub mod config;
pub mod entities;
pub mod error;
pub mod extract;
pub mod load;
pub mod project;
pub mod source;
pub mod writer;

#[cfg(test)]
pub(crate) mod fixtures;

pub use entities::DerivedModel;
pub use error::{PipelineError, Result};
pub use source::Snapshot;
