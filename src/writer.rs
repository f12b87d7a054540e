//! Physical target emission
//!
//! One CSV file per relational table, one JSON array-of-objects file per
//! document collection, and node/edge CSV files under `nodes/` and `edges/`
//! for the graph target. Output directories are created on demand; an
//! existing file with the same name is overwritten.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::config::TransformConfig;
use crate::error::Result;
use crate::project::{DocumentTarget, GraphTarget, RelationalTarget, Targets};

/// Serialize rows into one CSV file. The header row is written explicitly
/// so an empty table still carries its column names.
pub fn write_csv<T: Serialize>(path: &Path, headers: &[&str], rows: &[T]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    writer.write_record(headers)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Serialize rows into one JSON array-of-objects file.
pub fn write_json<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let file = fs::File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, rows)?;
    writer.flush()?;
    Ok(())
}

/// Emit every relational table into `dir`. Header order matches the row
/// struct field order in `project::relational`.
pub fn write_relational(target: &RelationalTarget, dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)?;
    write_csv(
        &dir.join("messages.csv"),
        &["id", "campaign_id", "message_type", "channel"],
        &target.messages,
    )?;
    write_csv(
        &dir.join("message_sent.csv"),
        &[
            "message_id",
            "abstract_message_id",
            "client_id",
            "email_provider",
            "platform",
            "created_at",
            "updated_at",
            "sent_at",
        ],
        &target.message_sent,
    )?;
    write_csv(
        &dir.join("message_behavior.csv"),
        &[
            "message_id",
            "behavior_type",
            "happened_first_time",
            "happened_last_time",
        ],
        &target.message_behavior,
    )?;
    write_csv(
        &dir.join("campaigns.csv"),
        &["campaign_pk", "campaign_type", "channel", "topic"],
        &target.campaigns,
    )?;
    write_csv(
        &dir.join("campaign_bulks.csv"),
        &[
            "campaign_pk",
            "started_at",
            "finished_at",
            "total_count",
            "warmup_mode",
            "hour_limit",
            "ab_test",
        ],
        &target.campaign_bulks,
    )?;
    write_csv(
        &dir.join("campaign_triggers.csv"),
        &["campaign_pk", "position"],
        &target.campaign_triggers,
    )?;
    write_csv(
        &dir.join("campaign_subjects.csv"),
        &[
            "campaign_pk",
            "subject_length",
            "subject_with_personalization",
            "subject_with_deadline",
            "subject_with_emoji",
            "subject_with_bonuses",
            "subject_with_discount",
            "subject_with_saleout",
        ],
        &target.campaign_subjects,
    )?;
    write_csv(
        &dir.join("products.csv"),
        &["product_pk", "product_id", "category_id", "category_code"],
        &target.products,
    )?;
    write_csv(
        &dir.join("product_cards.csv"),
        &["product_card_pk", "product_pk", "brand"],
        &target.product_cards,
    )?;
    write_csv(
        &dir.join("events.csv"),
        &[
            "product_card_pk",
            "user_id",
            "event_time",
            "event_type",
            "user_session",
            "price",
        ],
        &target.events,
    )?;
    write_csv(
        &dir.join("clients.csv"),
        &["client_id", "user_id", "user_device_id", "first_purchase_date"],
        &target.clients,
    )?;
    write_csv(&dir.join("users.csv"), &["user_id"], &target.users)?;
    write_csv(
        &dir.join("friends.csv"),
        &["friend1", "friend2"],
        &target.friends,
    )?;
    info!(dir = %dir.display(), "relational target written");
    Ok(())
}

/// Emit every document collection into `dir`.
pub fn write_document(target: &DocumentTarget, dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)?;
    write_json(&dir.join("messages.json"), &target.messages)?;
    write_json(&dir.join("campaigns.json"), &target.campaigns)?;
    write_json(&dir.join("users.json"), &target.users)?;
    write_json(&dir.join("products.json"), &target.products)?;
    write_json(&dir.join("events.json"), &target.events)?;
    write_json(&dir.join("friends.json"), &target.friends)?;
    info!(dir = %dir.display(), "document target written");
    Ok(())
}

/// Emit the graph node and edge files into `dir/nodes` and `dir/edges`.
pub fn write_graph(target: &GraphTarget, dir: &Path) -> Result<()> {
    let nodes_dir = dir.join("nodes");
    let edges_dir = dir.join("edges");
    fs::create_dir_all(&nodes_dir)?;
    fs::create_dir_all(&edges_dir)?;

    for table in &target.nodes {
        write_graph_table(&nodes_dir, table)?;
    }
    for table in &target.edges {
        write_graph_table(&edges_dir, table)?;
    }
    info!(
        dir = %dir.display(),
        nodes = target.nodes.len(),
        edges = target.edges.len(),
        "graph target written"
    );
    Ok(())
}

fn write_graph_table(dir: &Path, table: &crate::project::graph::GraphTable) -> Result<()> {
    let mut writer = csv::Writer::from_path(dir.join(format!("{}.csv", table.name)))?;
    writer.write_record(&table.headers)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Emit all three targets into their configured directories.
pub fn write_all(targets: &Targets, config: &TransformConfig) -> Result<()> {
    write_relational(&targets.relational, &config.relational_dir)?;
    write_document(&targets.document, &config.document_dir)?;
    write_graph(&targets.graph, &config.graph_dir)?;
    Ok(())
}
