//! Property-graph projection
//!
//! Emits bulk-import tables: one CSV per node label and per edge type.
//! Column roles are encoded in the header (`<col>:ID(<Label>)`, `:LABEL`,
//! `<col>:START_ID(<Label>)`, `<col>:END_ID(<Label>)`, `:TYPE`); plain
//! columns are properties. Every edge endpoint is resolved against the
//! emitted node set; rows whose endpoint cannot be resolved are dropped.

use std::collections::{HashMap, HashSet};

use chrono::{NaiveDate, NaiveDateTime};

use crate::entities::DerivedModel;

/// One node or edge CSV: a file name stem, its header row and data rows,
/// all already textual.
#[derive(Debug, Clone)]
pub struct GraphTable {
    pub name: &'static str,
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
}

/// The complete graph target: node files and edge files.
#[derive(Debug, Default)]
pub struct GraphTarget {
    pub nodes: Vec<GraphTable>,
    pub edges: Vec<GraphTable>,
}

fn opt_str(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn opt_ts(value: &Option<NaiveDateTime>) -> String {
    value.map(|ts| ts.to_string()).unwrap_or_default()
}

fn opt_date(value: &Option<NaiveDate>) -> String {
    value.map(|date| date.to_string()).unwrap_or_default()
}

fn opt_i64(value: &Option<i64>) -> String {
    value.map(|n| n.to_string()).unwrap_or_default()
}

fn opt_bool(value: &Option<bool>) -> String {
    value.map(|b| b.to_string()).unwrap_or_default()
}

/// Project the derived model into the graph target.
pub fn project_graph(model: &DerivedModel) -> GraphTarget {
    let mut target = GraphTarget::default();

    // ---- node files ----

    target.nodes.push(GraphTable {
        name: "messages",
        headers: vec![
            "message_id:ID(Message)",
            "email_provider",
            "platform",
            "created_at",
            "updated_at",
            "sent_at",
            ":LABEL",
        ],
        rows: model
            .messages_sent
            .iter()
            .map(|sent| {
                vec![
                    sent.message_id.clone(),
                    opt_str(&sent.email_provider),
                    opt_str(&sent.platform),
                    opt_ts(&sent.created_at),
                    opt_ts(&sent.updated_at),
                    opt_ts(&sent.sent_at),
                    "Message".to_string(),
                ]
            })
            .collect(),
    });

    target.nodes.push(GraphTable {
        name: "campaigns",
        headers: vec![
            "campaign_pk:ID(Campaign)",
            "campaign_type",
            "channel",
            "topic",
            ":LABEL",
        ],
        rows: model
            .campaigns
            .iter()
            .map(|campaign| {
                vec![
                    campaign.campaign_pk.to_string(),
                    campaign.campaign_type.clone(),
                    campaign.channel.clone(),
                    opt_str(&campaign.topic),
                    "Campaign".to_string(),
                ]
            })
            .collect(),
    });

    target.nodes.push(GraphTable {
        name: "campaign_bulks",
        headers: vec![
            "campaign_pk:ID(CampaignBulk)",
            "started_at",
            "finished_at",
            "total_count",
            "warmup_mode",
            "hour_limit",
            "ab_test",
            ":LABEL",
        ],
        rows: model
            .campaigns
            .iter()
            .filter_map(|campaign| {
                let details = campaign.bulk_details.as_ref()?;
                Some(vec![
                    campaign.campaign_pk.to_string(),
                    details.started_at.to_string(),
                    opt_ts(&details.finished_at),
                    opt_i64(&details.total_count),
                    details.warmup_mode.to_string(),
                    opt_i64(&details.hour_limit),
                    details.ab_test.to_string(),
                    "CampaignBulk".to_string(),
                ])
            })
            .collect(),
    });

    target.nodes.push(GraphTable {
        name: "campaign_triggers",
        headers: vec!["campaign_pk:ID(CampaignTrigger)", "position", ":LABEL"],
        rows: model
            .campaigns
            .iter()
            .filter_map(|campaign| {
                let details = campaign.trigger_details.as_ref()?;
                Some(vec![
                    campaign.campaign_pk.to_string(),
                    details.position.to_string(),
                    "CampaignTrigger".to_string(),
                ])
            })
            .collect(),
    });

    target.nodes.push(GraphTable {
        name: "campaign_subjects",
        headers: vec![
            "campaign_pk:ID(CampaignSubject)",
            "subject_length",
            "subject_with_personalization",
            "subject_with_deadline",
            "subject_with_emoji",
            "subject_with_bonuses",
            "subject_with_discount",
            "subject_with_saleout",
            ":LABEL",
        ],
        rows: model
            .campaigns
            .iter()
            .filter_map(|campaign| {
                let details = campaign.subject_details.as_ref()?;
                Some(vec![
                    campaign.campaign_pk.to_string(),
                    opt_i64(&details.subject_length),
                    opt_bool(&details.subject_with_personalization),
                    opt_bool(&details.subject_with_deadline),
                    opt_bool(&details.subject_with_emoji),
                    opt_bool(&details.subject_with_bonuses),
                    opt_bool(&details.subject_with_discount),
                    opt_bool(&details.subject_with_saleout),
                    "CampaignSubject".to_string(),
                ])
            })
            .collect(),
    });

    target.nodes.push(GraphTable {
        name: "clients",
        headers: vec![
            "client_id:ID(Client)",
            "client_device_id",
            "first_purchase_date",
            ":LABEL",
        ],
        rows: model
            .clients
            .iter()
            .map(|client| {
                vec![
                    client.client_id.to_string(),
                    client.user_device_id.to_string(),
                    opt_date(&client.first_purchase_date),
                    "Client".to_string(),
                ]
            })
            .collect(),
    });

    target.nodes.push(GraphTable {
        name: "users",
        headers: vec!["user_id:ID(User)", ":LABEL"],
        rows: model
            .users
            .iter()
            .map(|user_id| vec![user_id.to_string(), "User".to_string()])
            .collect(),
    });

    target.nodes.push(GraphTable {
        name: "products",
        headers: vec![
            "product_pk:ID(Product)",
            "product_id",
            "brand",
            "category_id",
            "category_code",
            ":LABEL",
        ],
        rows: model
            .catalog_products
            .iter()
            .map(|product| {
                vec![
                    product.product_pk.to_string(),
                    product.product_id.to_string(),
                    opt_str(&product.brand),
                    product.category_id.to_string(),
                    opt_str(&product.category_code),
                    "Product".to_string(),
                ]
            })
            .collect(),
    });

    // ---- edge files ----

    // resolution sets for inner-join endpoint checks
    let campaign_pks: HashSet<i64> = model
        .campaigns
        .iter()
        .map(|campaign| campaign.campaign_pk)
        .collect();
    let message_clients: HashMap<&str, i64> = model
        .messages_sent
        .iter()
        .map(|sent| (sent.message_id.as_str(), sent.client_id))
        .collect();
    let abstract_campaigns: HashMap<i64, i64> = model
        .abstract_messages
        .iter()
        .map(|abs| (abs.id, abs.campaign_id))
        .collect();

    target.edges.push(GraphTable {
        name: "sent_to",
        headers: vec![
            "message_id:START_ID(Message)",
            "client_id:END_ID(Client)",
            ":TYPE",
        ],
        rows: model
            .messages_sent
            .iter()
            .map(|sent| {
                vec![
                    sent.message_id.clone(),
                    sent.client_id.to_string(),
                    "SENT_TO".to_string(),
                ]
            })
            .collect(),
    });

    target.edges.push(GraphTable {
        name: "belongs_to",
        headers: vec![
            "message_id:START_ID(Message)",
            "campaign_pk:END_ID(Campaign)",
            ":TYPE",
        ],
        rows: model
            .messages_sent
            .iter()
            .filter_map(|sent| {
                let campaign_id = abstract_campaigns.get(&sent.abstract_message_id)?;
                if !campaign_pks.contains(campaign_id) {
                    return None;
                }
                Some(vec![
                    sent.message_id.clone(),
                    campaign_id.to_string(),
                    "BELONGS_TO".to_string(),
                ])
            })
            .collect(),
    });

    target.edges.push(GraphTable {
        name: "do_behavior",
        headers: vec![
            "client_id:START_ID(Client)",
            "message_id:END_ID(Message)",
            "behavior_type",
            "happened_first_time",
            "happened_last_time",
            ":TYPE",
        ],
        rows: model
            .message_behaviors
            .iter()
            .filter_map(|behavior| {
                let client_id = message_clients.get(behavior.message_id.as_str())?;
                Some(vec![
                    client_id.to_string(),
                    behavior.message_id.clone(),
                    behavior.behavior_type.to_string(),
                    opt_ts(&behavior.happened_first_time),
                    opt_ts(&behavior.happened_last_time),
                    "DO_BEHAVIOR".to_string(),
                ])
            })
            .collect(),
    });

    // a campaign and its detail node share the same key, so the key column
    // appears twice under distinct START_ID/END_ID roles
    target.edges.push(detail_edges(
        model,
        "has_bulk_details",
        "CampaignBulk",
        |campaign| campaign.bulk_details.is_some(),
    ));
    target.edges.push(detail_edges(
        model,
        "has_trigger_details",
        "CampaignTrigger",
        |campaign| campaign.trigger_details.is_some(),
    ));
    target.edges.push(detail_edges(
        model,
        "has_subject_details",
        "CampaignSubject",
        |campaign| campaign.subject_details.is_some(),
    ));

    target.edges.push(GraphTable {
        name: "friendship",
        headers: vec!["friend1:START_ID(User)", "friend2:END_ID(User)", ":TYPE"],
        rows: model
            .friendships
            .iter()
            .map(|pair| {
                vec![
                    pair.friend1.to_string(),
                    pair.friend2.to_string(),
                    "FRIENDSHIP".to_string(),
                ]
            })
            .collect(),
    });

    target.edges.push(GraphTable {
        name: "events",
        headers: vec![
            "product_pk:START_ID(Product)",
            "user_id:END_ID(User)",
            "event_time",
            "event_type",
            "user_session",
            "price",
            ":TYPE",
        ],
        rows: model
            .catalog_events
            .iter()
            .map(|event| {
                vec![
                    event.product_pk.to_string(),
                    event.user_id.to_string(),
                    opt_ts(&event.event_time),
                    event.event_type.clone(),
                    opt_str(&event.user_session),
                    event.price.to_string(),
                    "events".to_string(),
                ]
            })
            .collect(),
    });

    target.edges.push(GraphTable {
        name: "owns",
        headers: vec!["user_id:START_ID(User)", "client_id:END_ID(Client)", ":TYPE"],
        rows: model
            .clients
            .iter()
            .map(|client| {
                vec![
                    client.user_id.to_string(),
                    client.client_id.to_string(),
                    "OWNS".to_string(),
                ]
            })
            .collect(),
    });

    target
}

fn detail_edges(
    model: &DerivedModel,
    edge_type: &'static str,
    end_label: &'static str,
    has_details: fn(&crate::entities::Campaign) -> bool,
) -> GraphTable {
    let end_header = match end_label {
        "CampaignBulk" => "detail_pk:END_ID(CampaignBulk)",
        "CampaignTrigger" => "detail_pk:END_ID(CampaignTrigger)",
        _ => "detail_pk:END_ID(CampaignSubject)",
    };
    GraphTable {
        name: edge_type,
        headers: vec!["campaign_pk:START_ID(Campaign)", end_header, ":TYPE"],
        rows: model
            .campaigns
            .iter()
            .filter(|campaign| has_details(campaign))
            .map(|campaign| {
                vec![
                    campaign.campaign_pk.to_string(),
                    campaign.campaign_pk.to_string(),
                    edge_type.to_string(),
                ]
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{
        AbstractMessage, Campaign, CampaignTriggerDetails, MessageBehavior, MessageSent,
    };

    fn sent(message_id: &str, abstract_message_id: i64, client_id: i64) -> MessageSent {
        MessageSent {
            message_id: message_id.to_string(),
            abstract_message_id,
            client_id,
            email_provider: None,
            platform: None,
            created_at: None,
            updated_at: None,
            sent_at: None,
        }
    }

    fn trigger_campaign(campaign_pk: i64) -> Campaign {
        Campaign {
            campaign_pk,
            campaign_type: "trigger".to_string(),
            channel: "sms".to_string(),
            topic: None,
            bulk_details: None,
            trigger_details: Some(CampaignTriggerDetails { position: 1 }),
            subject_details: None,
        }
    }

    fn table<'a>(tables: &'a [GraphTable], name: &str) -> &'a GraphTable {
        tables.iter().find(|t| t.name == name).unwrap()
    }

    #[test]
    fn node_headers_carry_id_and_label_roles() {
        let target = project_graph(&DerivedModel::default());
        assert_eq!(target.nodes.len(), 8);
        for node in &target.nodes {
            assert!(node.headers.first().unwrap().contains(":ID("));
            assert_eq!(*node.headers.last().unwrap(), ":LABEL");
        }
    }

    #[test]
    fn edge_headers_carry_start_end_and_type_roles() {
        let target = project_graph(&DerivedModel::default());
        assert_eq!(target.edges.len(), 9);
        for edge in &target.edges {
            assert!(edge.headers[0].contains(":START_ID("));
            assert!(edge.headers[1].contains(":END_ID("));
            assert_eq!(*edge.headers.last().unwrap(), ":TYPE");
        }
    }

    #[test]
    fn edge_type_strings_preserve_source_casing() {
        let target = project_graph(&DerivedModel::default());
        let names: Vec<&str> = target.edges.iter().map(|e| e.name).collect();
        assert_eq!(
            names,
            vec![
                "sent_to",
                "belongs_to",
                "do_behavior",
                "has_bulk_details",
                "has_trigger_details",
                "has_subject_details",
                "friendship",
                "events",
                "owns",
            ]
        );
    }

    #[test]
    fn belongs_to_drops_messages_of_excluded_campaigns() {
        let model = DerivedModel {
            abstract_messages: vec![
                AbstractMessage {
                    id: 1,
                    campaign_id: 0,
                    message_type: "promo".to_string(),
                    channel: "sms".to_string(),
                },
                AbstractMessage {
                    id: 2,
                    campaign_id: 7, // campaign 7 was excluded upstream
                    message_type: "promo".to_string(),
                    channel: "sms".to_string(),
                },
            ],
            messages_sent: vec![sent("m-1", 1, 5), sent("m-2", 2, 5)],
            campaigns: vec![trigger_campaign(0)],
            ..DerivedModel::default()
        };
        let target = project_graph(&model);
        let belongs = table(&target.edges, "belongs_to");
        assert_eq!(belongs.rows.len(), 1);
        assert_eq!(belongs.rows[0][0], "m-1");
        assert_eq!(belongs.rows[0][2], "BELONGS_TO");
    }

    #[test]
    fn do_behavior_drops_rows_without_a_sent_fact() {
        let model = DerivedModel {
            messages_sent: vec![sent("m-1", 1, 42)],
            message_behaviors: vec![
                MessageBehavior {
                    message_id: "m-1".to_string(),
                    behavior_type: "opened",
                    happened_first_time: None,
                    happened_last_time: None,
                },
                MessageBehavior {
                    message_id: "m-ghost".to_string(),
                    behavior_type: "opened",
                    happened_first_time: None,
                    happened_last_time: None,
                },
            ],
            ..DerivedModel::default()
        };
        let target = project_graph(&model);
        let behaviors = table(&target.edges, "do_behavior");
        assert_eq!(behaviors.rows.len(), 1);
        assert_eq!(behaviors.rows[0][0], "42");
        assert_eq!(behaviors.rows[0][1], "m-1");
    }

    #[test]
    fn detail_edges_duplicate_the_campaign_key_under_both_roles() {
        let model = DerivedModel {
            campaigns: vec![trigger_campaign(3)],
            ..DerivedModel::default()
        };
        let target = project_graph(&model);
        let edge = table(&target.edges, "has_trigger_details");
        assert_eq!(edge.rows.len(), 1);
        assert_eq!(edge.rows[0], vec!["3", "3", "has_trigger_details"]);

        let bulk_edge = table(&target.edges, "has_bulk_details");
        assert!(bulk_edge.rows.is_empty());
    }

    #[test]
    fn detail_nodes_exist_only_for_members() {
        let model = DerivedModel {
            campaigns: vec![trigger_campaign(3)],
            ..DerivedModel::default()
        };
        let target = project_graph(&model);
        assert_eq!(table(&target.nodes, "campaign_triggers").rows.len(), 1);
        assert!(table(&target.nodes, "campaign_bulks").rows.is_empty());
        assert!(table(&target.nodes, "campaign_subjects").rows.is_empty());
    }

    #[test]
    fn every_row_matches_its_header_width() {
        let model = DerivedModel {
            campaigns: vec![trigger_campaign(0)],
            users: vec![1, 2],
            ..DerivedModel::default()
        };
        let target = project_graph(&model);
        for table in target.nodes.iter().chain(target.edges.iter()) {
            for row in &table.rows {
                assert_eq!(row.len(), table.headers.len(), "table {}", table.name);
            }
        }
    }
}
