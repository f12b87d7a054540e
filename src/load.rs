//! Source snapshot loading
//!
//! Thin boundary between the delimited source files and the typed records
//! the pipeline consumes. Every column the record structs declare must be
//! present; a missing header or an unparseable mandatory value aborts the
//! load with an input-shape error naming the offending file.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::info;

use crate::error::{PipelineError, Result};
use crate::source::Snapshot;

/// File names of the five source tables, resolved against the dataset dir.
pub const MESSAGES_FILE: &str = "messages.csv";
pub const CAMPAIGNS_FILE: &str = "campaigns.csv";
pub const EVENTS_FILE: &str = "events.csv";
pub const FIRST_PURCHASES_FILE: &str = "client_first_purchase_date.csv";
pub const FRIENDS_FILE: &str = "friends.csv";

/// Read one delimited file into typed rows. Deserialization failures are
/// input-shape errors carrying the file path.
pub fn read_table<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let mut reader = csv::Reader::from_path(path).map_err(|err| {
        PipelineError::InputShape(format!("{}: {err}", path.display()))
    })?;
    let mut rows = Vec::new();
    for record in reader.deserialize() {
        let row: T = record.map_err(|err| {
            PipelineError::InputShape(format!("{}: {err}", path.display()))
        })?;
        rows.push(row);
    }
    Ok(rows)
}

/// Load the full snapshot from a dataset directory.
pub fn load_snapshot(dataset_dir: &Path) -> Result<Snapshot> {
    let path = |file: &str| -> PathBuf { dataset_dir.join(file) };

    let snapshot = Snapshot {
        messages: read_table(&path(MESSAGES_FILE))?,
        campaigns: read_table(&path(CAMPAIGNS_FILE))?,
        events: read_table(&path(EVENTS_FILE))?,
        first_purchases: read_table(&path(FIRST_PURCHASES_FILE))?,
        friends: read_table(&path(FRIENDS_FILE))?,
    };
    info!(
        messages = snapshot.messages.len(),
        campaigns = snapshot.campaigns.len(),
        events = snapshot.events.len(),
        first_purchases = snapshot.first_purchases.len(),
        friends = snapshot.friends.len(),
        "snapshot loaded"
    );
    Ok(snapshot)
}
