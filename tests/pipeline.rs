//! End-to-end run: source CSVs in, three targets out.

use std::fs;
use std::path::Path;

use pretty_assertions::assert_eq;
use polystore_etl::config::TransformConfig;
use polystore_etl::{extract, load, project, writer};

const MESSAGE_HEADERS: &str = "\
message_id,campaign_id,message_type,channel,platform,email_provider,user_device_id,user_id,client_id,\
is_clicked,is_opened,is_unsubscribed,is_hard_bounced,is_soft_bounced,is_complained,is_purchased,is_blocked,\
clicked_first_time_at,clicked_last_time_at,opened_first_time_at,opened_last_time_at,unsubscribed_at,\
hard_bounced_at,soft_bounced_at,complained_at,purchased_at,blocked_at,created_at,updated_at,sent_at";

fn message_row(
    message_id: &str,
    campaign_id: i64,
    channel: &str,
    user_id: i64,
    client_id: i64,
    opened: bool,
) -> String {
    let opened_flag = if opened { "t" } else { "f" };
    let opened_at = if opened { "2023-01-05 10:00:00" } else { "" };
    format!(
        "{message_id},{campaign_id},promo,{channel},android,,1,{user_id},{client_id},\
f,{opened_flag},f,f,f,f,f,f,\
,,{opened_at},,,,,,,,2023-01-01 00:00:00,,2023-01-02 08:00:00"
    )
}

fn write_dataset(dir: &Path) {
    let mut messages = vec![MESSAGE_HEADERS.to_string()];
    messages.push(message_row("m-1", 0, "email", 100, 5, true));
    messages.push(message_row("m-2", 0, "email", 101, 6, false));
    // belongs to the campaign excluded below
    messages.push(message_row("m-3", 10, "sms", 102, 7, false));
    fs::write(dir.join("messages.csv"), messages.join("\n") + "\n").unwrap();

    let mut campaigns = vec![
        "campaign_type,channel,topic,total_count,ab_test,warmup_mode,is_test,hour_limit,\
subject_length,subject_with_personalization,subject_with_deadline,subject_with_emoji,\
subject_with_bonuses,subject_with_discount,subject_with_saleout,position,started_at,finished_at"
            .to_string(),
    ];
    for _ in 0..10 {
        campaigns
            .push("trigger,mobile_push,news,,f,f,f,,,,,,,,,1,,".to_string());
    }
    // row index 10: bulk campaign that never started, excluded everywhere
    campaigns.push("bulk,email,sale,5000,f,f,f,,30,t,,f,,,,,,".to_string());
    fs::write(dir.join("campaigns.csv"), campaigns.join("\n") + "\n").unwrap();

    fs::write(
        dir.join("events.csv"),
        "event_time,event_type,product_id,category_id,category_code,brand,price,user_id,user_session\n\
2020-04-01 10:15:00 UTC,view,9,2,shoes,adidas,59.99,100,s-1\n\
2020-04-01 11:15:00 UTC,view,9,2,,adidas,59.99,100,s-1\n",
    )
    .unwrap();

    fs::write(
        dir.join("client_first_purchase_date.csv"),
        "client_id,user_id,user_device_id,first_purchase_date\n5,100,1,2023-06-01\n",
    )
    .unwrap();

    fs::write(dir.join("friends.csv"), "friend1,friend2\n3,7\n7,3\n").unwrap();
}

#[test]
fn full_run_produces_all_three_targets() {
    let dataset = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    write_dataset(dataset.path());

    let config = TransformConfig::new(
        dataset.path().to_path_buf(),
        out.path().to_path_buf(),
    );
    config.validate().unwrap();

    let snapshot = load::load_snapshot(&config.dataset_dir).unwrap();
    let model = extract::derive_model(&snapshot);
    let targets = project::project_all(&model);
    writer::write_all(&targets, &config).unwrap();

    // two channel tuples, so two abstract message keys
    assert_eq!(model.abstract_messages.len(), 2);

    // ten surviving campaigns, the bulk campaign at row 10 excluded
    assert_eq!(model.campaigns.len(), 10);
    assert!(model.campaigns.iter().all(|c| c.campaign_pk != 10));

    // category mode: shoes wins over the null observation
    assert_eq!(model.products.len(), 1);
    assert_eq!(model.products[0].category_code.as_deref(), Some("shoes"));

    // mirrored friendship collapses to one canonical pair
    assert_eq!(model.friendships.len(), 1);

    for name in [
        "messages.csv",
        "message_sent.csv",
        "message_behavior.csv",
        "campaigns.csv",
        "campaign_bulks.csv",
        "campaign_triggers.csv",
        "campaign_subjects.csv",
        "products.csv",
        "product_cards.csv",
        "events.csv",
        "clients.csv",
        "users.csv",
        "friends.csv",
    ] {
        assert!(config.relational_dir.join(name).exists(), "missing {name}");
    }
    // the only bulk campaign was excluded, so its sub-table is empty but
    // still carries the key columns
    let bulks =
        fs::read_to_string(config.relational_dir.join("campaign_bulks.csv")).unwrap();
    assert_eq!(
        bulks,
        "campaign_pk,started_at,finished_at,total_count,warmup_mode,hour_limit,ab_test\n"
    );
    for name in [
        "messages.json",
        "campaigns.json",
        "users.json",
        "products.json",
        "events.json",
        "friends.json",
    ] {
        assert!(config.document_dir.join(name).exists(), "missing {name}");
    }
    assert!(config.graph_dir.join("nodes").is_dir());
    assert!(config.graph_dir.join("edges").is_dir());
}

#[test]
fn excluded_campaign_is_absent_from_every_target() {
    let dataset = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    write_dataset(dataset.path());

    let config = TransformConfig::new(
        dataset.path().to_path_buf(),
        out.path().to_path_buf(),
    );
    let snapshot = load::load_snapshot(&config.dataset_dir).unwrap();
    let model = extract::derive_model(&snapshot);
    let targets = project::project_all(&model);
    writer::write_all(&targets, &config).unwrap();

    // relational: no campaigns row with pk 10
    let campaigns = fs::read_to_string(config.relational_dir.join("campaigns.csv")).unwrap();
    assert!(!campaigns.lines().any(|line| line.starts_with("10,")));

    // document: no campaign document with id 10
    let docs: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(config.document_dir.join("campaigns.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(docs.as_array().unwrap().len(), 10);
    assert!(docs
        .as_array()
        .unwrap()
        .iter()
        .all(|doc| doc["id"] != serde_json::json!(10)));

    // graph: no Campaign node 10, and no BELONGS_TO edge from its message
    let nodes = fs::read_to_string(config.graph_dir.join("nodes/campaigns.csv")).unwrap();
    assert!(!nodes.lines().any(|line| line.starts_with("10,")));
    let belongs = fs::read_to_string(config.graph_dir.join("edges/belongs_to.csv")).unwrap();
    assert!(belongs.contains("m-1,0,BELONGS_TO"));
    assert!(belongs.contains("m-2,0,BELONGS_TO"));
    assert!(!belongs.contains("m-3"));
}

#[test]
fn document_target_shapes_match_the_collection_contracts() {
    let dataset = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    write_dataset(dataset.path());

    let config = TransformConfig::new(
        dataset.path().to_path_buf(),
        out.path().to_path_buf(),
    );
    let snapshot = load::load_snapshot(&config.dataset_dir).unwrap();
    let model = extract::derive_model(&snapshot);
    let targets = project::project_all(&model);
    writer::write_all(&targets, &config).unwrap();

    let messages: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(config.document_dir.join("messages.json")).unwrap(),
    )
    .unwrap();
    let m1 = messages
        .as_array()
        .unwrap()
        .iter()
        .find(|doc| doc["message_id"] == "m-1")
        .unwrap();
    // opened behavior embedded; email_provider was empty in the source
    assert_eq!(m1["behaviors"][0]["behavior_type"], "opened");
    assert!(m1.get("email_provider").is_none());

    let m2 = messages
        .as_array()
        .unwrap()
        .iter()
        .find(|doc| doc["message_id"] == "m-2")
        .unwrap();
    assert_eq!(m2["behaviors"], serde_json::json!([]));

    let users: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(config.document_dir.join("users.json")).unwrap(),
    )
    .unwrap();
    let user_100 = users
        .as_array()
        .unwrap()
        .iter()
        .find(|doc| doc["user_id"] == 100)
        .unwrap();
    assert_eq!(user_100["devices"][0]["client_id"], 5);
    assert_eq!(user_100["devices"][0]["first_purchase_date"], "2023-06-01");
}

#[test]
fn graph_headers_follow_the_bulk_import_conventions() {
    let dataset = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    write_dataset(dataset.path());

    let config = TransformConfig::new(
        dataset.path().to_path_buf(),
        out.path().to_path_buf(),
    );
    let snapshot = load::load_snapshot(&config.dataset_dir).unwrap();
    let targets = project::project_all(&extract::derive_model(&snapshot));
    writer::write_all(&targets, &config).unwrap();

    let users = fs::read_to_string(config.graph_dir.join("nodes/users.csv")).unwrap();
    assert!(users.starts_with("user_id:ID(User),:LABEL\n"));

    let friendship = fs::read_to_string(config.graph_dir.join("edges/friendship.csv")).unwrap();
    assert!(friendship.starts_with("friend1:START_ID(User),friend2:END_ID(User),:TYPE\n"));
    assert!(friendship.contains("3,7,FRIENDSHIP"));

    let events = fs::read_to_string(config.graph_dir.join("edges/events.csv")).unwrap();
    // edge type casing comes straight from the source schema
    assert!(events.contains(",events\n") || events.trim_end().ends_with(",events"));
}
