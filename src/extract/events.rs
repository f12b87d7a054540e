//! Product, product-card and event derivation
//!
//! The relational target keys products on `(product_id, category_id)` and
//! links brands through product cards; the document/graph ("catalog")
//! target keys products on `(product_id, brand, category_id)` directly.
//! Both grains are derived here, side by side, from the same event rows.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDateTime;

use crate::entities::{CatalogEvent, CatalogProduct, EventFact, Product, ProductCard};
use crate::source::EventRecord;

/// Occurrence tally for `category_code` values of one product key, in
/// first-seen order so mode ties resolve deterministically.
#[derive(Default)]
struct CodeTally {
    counts: Vec<(String, usize)>,
}

impl CodeTally {
    fn add(&mut self, code: &str) {
        if let Some(entry) = self.counts.iter_mut().find(|(c, _)| c == code) {
            entry.1 += 1;
        } else {
            self.counts.push((code.to_string(), 1));
        }
    }

    /// Most frequent value; ties keep the first-occurring one. `None` when
    /// every observed value was null.
    fn mode(&self) -> Option<String> {
        let mut best: Option<(&str, usize)> = None;
        for (code, count) in &self.counts {
            match best {
                Some((_, best_count)) if *count <= best_count => {}
                _ => best = Some((code, *count)),
            }
        }
        best.map(|(code, _)| code.to_string())
    }
}

/// Derive relational-grain products, product cards and deduplicated event
/// facts. Surrogate keys are 1-based, assigned in first-seen order. A null
/// brand is a valid, distinct product-card key component.
pub fn extract_relational(events: &[EventRecord]) -> (Vec<Product>, Vec<ProductCard>, Vec<EventFact>) {
    let mut product_index: HashMap<(i64, i64), i64> = HashMap::new();
    let mut products: Vec<Product> = Vec::new();
    let mut tallies: HashMap<i64, CodeTally> = HashMap::new();

    let mut card_index: HashMap<(i64, Option<String>), i64> = HashMap::new();
    let mut cards: Vec<ProductCard> = Vec::new();

    let mut seen: HashSet<(i64, i64, Option<NaiveDateTime>)> = HashSet::new();
    let mut facts: Vec<EventFact> = Vec::new();

    for record in events {
        let product_key = (record.product_id, record.category_id);
        let next_product = product_index.len() as i64 + 1;
        let product_pk = *product_index.entry(product_key).or_insert_with(|| {
            products.push(Product {
                product_pk: next_product,
                product_id: record.product_id,
                category_id: record.category_id,
                category_code: None,
            });
            next_product
        });
        if let Some(code) = &record.category_code {
            tallies.entry(product_pk).or_default().add(code);
        }

        let card_key = (product_pk, record.brand.clone());
        let next_card = card_index.len() as i64 + 1;
        let product_card_pk = *card_index.entry(card_key).or_insert_with(|| {
            cards.push(ProductCard {
                product_card_pk: next_card,
                product_pk,
                brand: record.brand.clone(),
            });
            next_card
        });

        if seen.insert((product_card_pk, record.user_id, record.event_time)) {
            facts.push(EventFact {
                product_card_pk,
                user_id: record.user_id,
                event_time: record.event_time,
                event_type: record.event_type.clone(),
                user_session: record.user_session.clone(),
                price: record.price,
            });
        }
    }

    for product in &mut products {
        if let Some(tally) = tallies.get(&product.product_pk) {
            product.category_code = tally.mode();
        }
    }

    (products, cards, facts)
}

/// Derive catalog-grain products and deduplicated event facts for the
/// document/graph targets. The first-seen `category_code` per key is kept.
pub fn extract_catalog(events: &[EventRecord]) -> (Vec<CatalogProduct>, Vec<CatalogEvent>) {
    let mut index: HashMap<(i64, Option<String>, i64), i64> = HashMap::new();
    let mut products: Vec<CatalogProduct> = Vec::new();

    let mut seen: HashSet<(i64, i64, Option<NaiveDateTime>)> = HashSet::new();
    let mut facts: Vec<CatalogEvent> = Vec::new();

    for record in events {
        let key = (record.product_id, record.brand.clone(), record.category_id);
        let next = index.len() as i64 + 1;
        let product_pk = *index.entry(key).or_insert_with(|| {
            products.push(CatalogProduct {
                product_pk: next,
                product_id: record.product_id,
                brand: record.brand.clone(),
                category_id: record.category_id,
                category_code: record.category_code.clone(),
            });
            next
        });

        if seen.insert((product_pk, record.user_id, record.event_time)) {
            facts.push(CatalogEvent {
                product_pk,
                user_id: record.user_id,
                event_time: record.event_time,
                event_type: record.event_type.clone(),
                user_session: record.user_session.clone(),
                price: record.price,
            });
        }
    }

    (products, facts)
}
