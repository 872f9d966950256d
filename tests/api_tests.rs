//! Aggregation tests against an in-memory PokeAPI.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use dexview::api::{fetch_all, fetch_entity, ApiError, JsonSource};
use dexview::state::{Language, LIMIT_TIERS};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tokio::sync::Notify;

#[derive(Default)]
struct FakeSource {
    responses: HashMap<String, Value>,
    calls: Mutex<Vec<String>>,
}

impl FakeSource {
    fn insert(&mut self, path: impl Into<String>, value: Value) {
        self.responses.insert(path.into(), value);
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    fn add_entity(&mut self, id: u32, name: &str) {
        self.insert(
            format!("/pokemon/{name}"),
            json!({
                "id": id,
                "name": name,
                "height": 7,
                "weight": 69,
                "types": [{ "slot": 1, "type": { "name": "grass" } }],
                "stats": [{ "base_stat": 45, "stat": { "name": "hp" } }],
                "sprites": { "front_default": format!("https://sprites.example/{id}.png") },
                "cries": { "latest": format!("https://cries.example/{id}.ogg"), "legacy": null }
            }),
        );
        self.insert(
            format!("/pokemon-species/{name}"),
            json!({
                "name": name,
                "names": [
                    { "name": format!("{name}-en"), "language": { "name": "en" } },
                    { "name": format!("{name}-de"), "language": { "name": "de" } }
                ],
                "flavor_text_entries": [
                    { "flavor_text": "A\nplain\u{000C}entry", "language": { "name": "en" }, "version": { "name": "red" } }
                ],
                "genera": [{ "genus": "Seed Pokemon", "language": { "name": "en" } }]
            }),
        );
    }

    fn add_index(&mut self, limit: u16, names: &[String]) {
        let results: Vec<Value> = names
            .iter()
            .map(|name| json!({ "name": name, "url": format!("https://pokeapi.co/api/v2/pokemon/{name}/") }))
            .collect();
        self.insert(
            format!("/pokemon?offset=0&limit={limit}"),
            json!({ "count": names.len(), "results": results }),
        );
    }
}

#[async_trait]
impl JsonSource for FakeSource {
    async fn get_json(&self, path: &str) -> Result<Value, ApiError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(path.to_string());
        }
        self.responses
            .get(path)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(path.to_string()))
    }
}

fn dex(limit: u16) -> FakeSource {
    let mut source = FakeSource::default();
    let names: Vec<String> = (1..=u32::from(limit)).map(|id| format!("mon{id}")).collect();
    for (idx, name) in names.iter().enumerate() {
        source.add_entity(idx as u32 + 1, name);
    }
    source.add_index(limit, &names);
    source
}

#[tokio::test]
async fn test_batch_size_and_unique_ids_per_tier() {
    for tier in &LIMIT_TIERS {
        let source: Arc<dyn JsonSource> = Arc::new(dex(tier.limit));
        let entities = fetch_all(source, tier.limit).await.unwrap();

        assert_eq!(entities.len(), usize::from(tier.limit));
        let ids: HashSet<u32> = entities.iter().map(|entity| entity.id).collect();
        assert_eq!(ids.len(), entities.len());
        let ordered: Vec<u32> = entities.iter().map(|entity| entity.id).collect();
        let expected: Vec<u32> = (1..=u32::from(tier.limit)).collect();
        assert_eq!(ordered, expected);
    }
}

#[tokio::test]
async fn test_species_fallback_for_hyphenated_name() {
    let mut source = FakeSource::default();
    source.insert(
        "/pokemon/deoxys-normal",
        json!({ "id": 386, "name": "deoxys-normal", "height": 17, "weight": 608 }),
    );
    source.insert(
        "/pokemon-species/deoxys",
        json!({
            "name": "deoxys",
            "names": [{ "name": "Deoxys", "language": { "name": "en" } }]
        }),
    );

    let entity = fetch_entity(&source, "deoxys-normal").await.unwrap();

    assert_eq!(entity.id, 386);
    assert_eq!(entity.name, "deoxys-normal");
    assert_eq!(entity.species_name, "deoxys");
    assert_eq!(entity.localized_name(Language::En), "Deoxys");
    let calls = source.calls();
    assert!(calls.contains(&"/pokemon-species/deoxys-normal".to_string()));
    assert!(calls.contains(&"/pokemon-species/deoxys".to_string()));
}

#[tokio::test]
async fn test_species_never_overrides_core_identity() {
    let mut source = FakeSource::default();
    source.add_entity(25, "pikachu");
    source.insert(
        "/pokemon-species/pikachu",
        json!({
            "id": 9999,
            "name": "pikachu",
            "height": 1,
            "names": [{ "name": "Pikachu", "language": { "name": "en" } }]
        }),
    );

    let entity = fetch_entity(&source, "pikachu").await.unwrap();
    assert_eq!(entity.id, 25);
    assert_eq!(entity.height, 7);
    assert_eq!(entity.cry_url(), Some("https://cries.example/25.ogg"));
}

#[tokio::test]
async fn test_held_items_are_resolved() {
    let mut source = FakeSource::default();
    source.add_entity(25, "pikachu");
    source.insert(
        "/pokemon/pikachu",
        json!({
            "id": 25,
            "name": "pikachu",
            "held_items": [{
                "item": { "name": "light-ball" },
                "version_details": [{ "rarity": 5, "version": { "name": "yellow" } }]
            }]
        }),
    );
    source.insert(
        "/item/light-ball",
        json!({
            "name": "light-ball",
            "cost": 1000,
            "names": [{ "name": "Kugelblitz", "language": { "name": "de" } }],
            "sprites": { "default": "https://sprites.example/light-ball.png" }
        }),
    );

    let entity = fetch_entity(&source, "pikachu").await.unwrap();
    let item = &entity.held_items[0];
    assert_eq!(item.localized_name(Language::De), "Kugelblitz");
    assert_eq!(item.localized_name(Language::En), "light-ball");
    assert_eq!(item.rarity_by_version[0].rarity, 5);
    assert_eq!(item.detail.as_ref().and_then(|detail| detail.cost), Some(1000));
}

#[tokio::test]
async fn test_any_failure_fails_whole_batch() {
    let mut source = dex(151);
    source.responses.remove("/pokemon/mon42");

    let result = fetch_all(Arc::new(source), 151).await;
    assert!(matches!(result, Err(ApiError::NotFound(path)) if path == "/pokemon/mon42"));
}

#[tokio::test]
async fn test_missing_species_without_hyphen_is_an_error() {
    let mut source = FakeSource::default();
    source.add_entity(1, "bulbasaur");
    source.responses.remove("/pokemon-species/bulbasaur");

    let result = fetch_entity(&source, "bulbasaur").await;
    assert!(matches!(result, Err(ApiError::NotFound(_))));
    let species_calls = source
        .calls()
        .into_iter()
        .filter(|call| call.starts_with("/pokemon-species/"))
        .count();
    assert_eq!(species_calls, 1);
}

#[tokio::test]
async fn test_missing_item_fails_entity() {
    let mut source = FakeSource::default();
    source.add_entity(25, "pikachu");
    source.insert(
        "/pokemon/pikachu",
        json!({
            "id": 25,
            "name": "pikachu",
            "held_items": [{ "item": { "name": "light-ball" }, "version_details": [] }]
        }),
    );

    let result = fetch_entity(&source, "pikachu").await;
    assert!(matches!(result, Err(ApiError::NotFound(path)) if path == "/item/light-ball"));
}

#[tokio::test]
async fn test_failed_fallback_propagates() {
    let mut source = FakeSource::default();
    source.insert(
        "/pokemon/foo-bar",
        json!({ "id": 7, "name": "foo-bar" }),
    );

    let result = fetch_entity(&source, "foo-bar").await;
    assert!(matches!(result, Err(ApiError::NotFound(path)) if path == "/pokemon-species/foo"));
    let species_calls: Vec<String> = source
        .calls()
        .into_iter()
        .filter(|call| call.starts_with("/pokemon-species/"))
        .collect();
    assert_eq!(species_calls.len(), 2);
}

/// Holds species lookups until an item lookup has started.
struct SpeciesAfterItems {
    inner: FakeSource,
    item_requested: Notify,
}

#[async_trait]
impl JsonSource for SpeciesAfterItems {
    async fn get_json(&self, path: &str) -> Result<Value, ApiError> {
        if path.starts_with("/item/") {
            self.item_requested.notify_one();
        } else if path.starts_with("/pokemon-species/") {
            self.item_requested.notified().await;
        }
        self.inner.get_json(path).await
    }
}

#[tokio::test]
async fn test_items_do_not_wait_for_species() {
    let mut inner = FakeSource::default();
    inner.add_entity(25, "pikachu");
    inner.insert(
        "/pokemon/pikachu",
        json!({
            "id": 25,
            "name": "pikachu",
            "held_items": [{ "item": { "name": "light-ball" }, "version_details": [] }]
        }),
    );
    inner.insert("/item/light-ball", json!({ "name": "light-ball" }));
    let source = SpeciesAfterItems {
        inner,
        item_requested: Notify::new(),
    };

    let entity = tokio::time::timeout(Duration::from_secs(1), fetch_entity(&source, "pikachu"))
        .await
        .expect("species lookup blocked the item lookups")
        .unwrap();
    assert_eq!(entity.held_items.len(), 1);
    assert_eq!(entity.species_name, "pikachu");
}
