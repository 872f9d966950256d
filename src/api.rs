use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::future::try_join_all;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tokio::fs;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::state::{
    Ability, Cries, Entity, EntityStat, FlavorText, GameIndex, Genus, HeldItem, ItemDetail,
    LocalizedName, Sprites, VersionRarity,
};

pub const API_BASE: &str = "https://pokeapi.co/api/v2";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);
const ENTITY_CONCURRENCY: usize = 12;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned HTTP {status}")]
    Status { status: u16, url: String },
    #[error("could not decode {url}: {message}")]
    Decode { url: String, message: String },
    #[error("fetch task failed: {0}")]
    Task(String),
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound(_))
    }
}

/// Read-only access to PokeAPI JSON, addressed by path relative to the API base.
#[async_trait]
pub trait JsonSource: Send + Sync {
    async fn get_json(&self, path: &str) -> Result<serde_json::Value, ApiError>;
}

/// reqwest-backed source with an optional on-disk response cache.
pub struct HttpSource {
    client: reqwest::Client,
    base: String,
    cache_dir: Option<PathBuf>,
}

impl HttpSource {
    pub fn new(base: impl Into<String>, cache_dir: Option<PathBuf>) -> Result<Self, ApiError> {
        let base = base.into().trim_end_matches('/').to_string();
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|source| ApiError::Request {
                url: base.clone(),
                source,
            })?;
        Ok(Self {
            client,
            base,
            cache_dir,
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// Raw bytes for an absolute URL, used for cry audio.
    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        self.fetch_bytes_cached("audio", url).await
    }

    async fn fetch_bytes_cached(&self, kind: &str, url: &str) -> Result<Vec<u8>, ApiError> {
        let cache_path = self.cache_path(kind, url);
        if let Some(path) = &cache_path {
            if let Some(bytes) = read_cache(path).await {
                return Ok(bytes);
            }
        }

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| ApiError::Request {
                url: url.to_string(),
                source,
            })?;
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(url.to_string()));
        }
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|source| ApiError::Request {
                url: url.to_string(),
                source,
            })?
            .to_vec();
        if let Some(path) = &cache_path {
            write_cache(path, &bytes).await;
        }
        Ok(bytes)
    }

    fn cache_path(&self, kind: &str, url: &str) -> Option<PathBuf> {
        let root = self.cache_dir.as_ref()?;
        let mut hasher = Sha256::new();
        hasher.update(url.as_bytes());
        let digest = hex::encode(hasher.finalize());
        Some(root.join(kind).join(digest))
    }
}

#[async_trait]
impl JsonSource for HttpSource {
    async fn get_json(&self, path: &str) -> Result<serde_json::Value, ApiError> {
        let url = self.url(path);
        let bytes = self.fetch_bytes_cached("http", &url).await?;
        match serde_json::from_slice(&bytes) {
            Ok(value) => Ok(value),
            Err(err) => {
                if let Some(cache_path) = self.cache_path("http", &url) {
                    let _ = fs::remove_file(&cache_path).await;
                }
                Err(ApiError::Decode {
                    url,
                    message: err.to_string(),
                })
            }
        }
    }
}

async fn read_cache(path: &Path) -> Option<Vec<u8>> {
    fs::read(path).await.ok()
}

async fn write_cache(path: &Path, bytes: &[u8]) {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent).await;
    }
    if let Err(err) = fs::write(path, bytes).await {
        log::debug!("cache write failed for {}: {err}", path.display());
    }
}

#[derive(Clone, Debug, Deserialize)]
struct NamedResource {
    name: String,
}

#[derive(Clone, Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    results: Vec<NamedResource>,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonResponse {
    id: u32,
    name: String,
    #[serde(default)]
    height: u16,
    #[serde(default)]
    weight: u32,
    #[serde(default)]
    types: Vec<PokemonTypeSlot>,
    #[serde(default)]
    stats: Vec<PokemonStatSlot>,
    #[serde(default)]
    abilities: Vec<PokemonAbilitySlot>,
    #[serde(default)]
    sprites: serde_json::Value,
    #[serde(default)]
    cries: Option<PokemonCries>,
    #[serde(default)]
    held_items: Vec<HeldItemSlot>,
    #[serde(default)]
    game_indices: Vec<GameIndexSlot>,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonTypeSlot {
    #[serde(default)]
    slot: u8,
    #[serde(rename = "type")]
    type_info: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonStatSlot {
    base_stat: u16,
    stat: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonAbilitySlot {
    ability: NamedResource,
    #[serde(default)]
    is_hidden: bool,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonCries {
    latest: Option<String>,
    legacy: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
struct HeldItemSlot {
    item: NamedResource,
    #[serde(default)]
    version_details: Vec<HeldItemVersion>,
}

#[derive(Clone, Debug, Deserialize)]
struct HeldItemVersion {
    rarity: u16,
    version: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct GameIndexSlot {
    game_index: u32,
    version: NamedResource,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
struct SpeciesResponse {
    name: String,
    names: Vec<NameEntry>,
    flavor_text_entries: Vec<FlavorTextEntry>,
    genera: Vec<GenusEntry>,
}

#[derive(Clone, Debug, Deserialize)]
struct NameEntry {
    name: String,
    language: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct FlavorTextEntry {
    flavor_text: String,
    language: NamedResource,
    #[serde(default)]
    version: Option<NamedResource>,
}

#[derive(Clone, Debug, Deserialize)]
struct GenusEntry {
    genus: String,
    language: NamedResource,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
struct ItemResponse {
    name: String,
    names: Vec<NameEntry>,
    sprites: ItemSprites,
    cost: Option<u32>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
struct ItemSprites {
    default: Option<String>,
}

async fn fetch<T: DeserializeOwned>(source: &dyn JsonSource, path: &str) -> Result<T, ApiError> {
    let value = source.get_json(path).await?;
    serde_json::from_value(value).map_err(|err| ApiError::Decode {
        url: path.to_string(),
        message: err.to_string(),
    })
}

/// Loads the first `limit` entities and aggregates each one. Any failure other
/// than a recovered species lookup fails the whole batch.
pub async fn fetch_all(source: Arc<dyn JsonSource>, limit: u16) -> Result<Vec<Entity>, ApiError> {
    let index: ListResponse =
        fetch(source.as_ref(), &format!("/pokemon?offset=0&limit={limit}")).await?;
    let names: Vec<String> = index
        .results
        .into_iter()
        .take(usize::from(limit))
        .map(|entry| entry.name)
        .collect();
    log::info!("aggregating {} entities", names.len());

    let semaphore = Arc::new(Semaphore::new(ENTITY_CONCURRENCY));
    let mut join_set = JoinSet::new();
    for (position, name) in names.iter().cloned().enumerate() {
        let source = Arc::clone(&source);
        let semaphore = Arc::clone(&semaphore);
        join_set.spawn(async move {
            let _permit = semaphore
                .acquire_owned()
                .await
                .map_err(|_| ApiError::Task("entity semaphore closed".to_string()))?;
            let entity = fetch_entity(source.as_ref(), &name).await?;
            Ok::<_, ApiError>((position, entity))
        });
    }

    let mut entities = Vec::with_capacity(names.len());
    while let Some(joined) = join_set.join_next().await {
        let outcome = match joined {
            Ok(outcome) => outcome,
            Err(err) => Err(ApiError::Task(err.to_string())),
        };
        match outcome {
            Ok(entry) => entities.push(entry),
            Err(err) => {
                log::warn!("aggregation failed: {err}");
                join_set.abort_all();
                return Err(err);
            }
        }
    }

    entities.sort_by_key(|(position, _)| *position);
    Ok(entities.into_iter().map(|(_, entity)| entity).collect())
}

/// Core record, species record and held-item details merged into one entity.
pub async fn fetch_entity(source: &dyn JsonSource, name: &str) -> Result<Entity, ApiError> {
    // Item lookups only wait on the core record, not the species record.
    let core_and_items = async {
        let core_path = format!("/pokemon/{name}");
        let core = fetch::<PokemonResponse>(source, &core_path).await?;
        let item_paths: Vec<String> = core
            .held_items
            .iter()
            .map(|slot| format!("/item/{}", slot.item.name))
            .collect();
        let items = try_join_all(
            item_paths
                .iter()
                .map(|path| fetch::<ItemResponse>(source, path)),
        )
        .await?;
        Ok::<_, ApiError>((core, items))
    };
    let ((core, items), species) =
        tokio::try_join!(core_and_items, fetch_species(source, name))?;
    Ok(merge_entity(core, species, items))
}

async fn fetch_species(source: &dyn JsonSource, name: &str) -> Result<SpeciesResponse, ApiError> {
    match fetch(source, &format!("/pokemon-species/{name}")).await {
        Err(err) if err.is_not_found() => {
            let Some(base) = fallback_species_name(name) else {
                return Err(err);
            };
            log::debug!("species {name} not found, retrying as {base}");
            fetch(source, &format!("/pokemon-species/{base}")).await
        }
        result => result,
    }
}

/// Species name to try when a form name (e.g. `deoxys-normal`) has no species
/// record of its own.
pub fn fallback_species_name(name: &str) -> Option<&str> {
    name.split_once('-')
        .map(|(head, _)| head)
        .filter(|head| !head.is_empty())
}

fn localized_names(entries: Vec<NameEntry>) -> Vec<LocalizedName> {
    entries
        .into_iter()
        .map(|entry| LocalizedName {
            name: entry.name,
            language: entry.language.name,
        })
        .collect()
}

fn pointer_string(value: &serde_json::Value, pointer: &str) -> Option<String> {
    value
        .pointer(pointer)
        .and_then(|val| val.as_str())
        .map(|s| s.to_string())
}

fn merge_entity(core: PokemonResponse, species: SpeciesResponse, items: Vec<ItemResponse>) -> Entity {
    let mut types = core.types;
    types.sort_by_key(|slot| slot.slot);

    let sprites = Sprites {
        front_default: pointer_string(&core.sprites, "/front_default"),
        dream_world: pointer_string(&core.sprites, "/other/dream_world/front_default"),
        official_artwork: pointer_string(&core.sprites, "/other/official-artwork/front_default"),
    };

    let mut details = items.into_iter();
    let held_items = core
        .held_items
        .into_iter()
        .map(|slot| HeldItem {
            name: slot.item.name,
            rarity_by_version: slot
                .version_details
                .into_iter()
                .map(|detail| VersionRarity {
                    version: detail.version.name,
                    rarity: detail.rarity,
                })
                .collect(),
            detail: details.next().map(|item| ItemDetail {
                name: item.name,
                names: localized_names(item.names),
                sprite: item.sprites.default,
                cost: item.cost,
            }),
        })
        .collect();

    Entity {
        id: core.id,
        species_name: if species.name.is_empty() {
            core.name.clone()
        } else {
            species.name
        },
        name: core.name,
        names: localized_names(species.names),
        types: types.into_iter().map(|slot| slot.type_info.name).collect(),
        stats: core
            .stats
            .into_iter()
            .map(|slot| EntityStat {
                name: slot.stat.name,
                base: slot.base_stat,
            })
            .collect(),
        abilities: core
            .abilities
            .into_iter()
            .map(|slot| Ability {
                name: slot.ability.name,
                hidden: slot.is_hidden,
            })
            .collect(),
        height: core.height,
        weight: core.weight,
        sprites,
        cries: core.cries.map(|cries| Cries {
            latest: cries.latest,
            legacy: cries.legacy,
        }),
        held_items,
        game_indices: core
            .game_indices
            .into_iter()
            .map(|slot| GameIndex {
                index: slot.game_index,
                version: slot.version.name,
            })
            .collect(),
        flavor_text_entries: species
            .flavor_text_entries
            .into_iter()
            .map(|entry| FlavorText {
                text: entry.flavor_text,
                language: entry.language.name,
                version: entry.version.map(|version| version.name),
            })
            .collect(),
        genera: species
            .genera
            .into_iter()
            .map(|entry| Genus {
                genus: entry.genus,
                language: entry.language.name,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fallback_takes_head_before_first_hyphen() {
        assert_eq!(fallback_species_name("deoxys-normal"), Some("deoxys"));
        assert_eq!(fallback_species_name("mr-mime-galar"), Some("mr"));
        assert_eq!(fallback_species_name("pikachu"), None);
        assert_eq!(fallback_species_name("-x"), None);
    }

    #[test]
    fn merge_orders_types_by_slot_and_keeps_core_identity() {
        let core: PokemonResponse = serde_json::from_value(json!({
            "id": 6,
            "name": "charizard",
            "height": 17,
            "weight": 905,
            "types": [
                { "slot": 2, "type": { "name": "flying" } },
                { "slot": 1, "type": { "name": "fire" } }
            ],
            "sprites": {
                "front_default": "front.png",
                "other": { "official-artwork": { "front_default": "art.png" } }
            },
            "held_items": [
                { "item": { "name": "charcoal" }, "version_details": [] }
            ]
        }))
        .unwrap();
        let species: SpeciesResponse = serde_json::from_value(json!({
            "name": "charizard",
            "names": [{ "name": "Glurak", "language": { "name": "de" } }]
        }))
        .unwrap();
        let item: ItemResponse = serde_json::from_value(json!({
            "name": "charcoal",
            "names": [{ "name": "Holzkohle", "language": { "name": "de" } }],
            "sprites": { "default": "charcoal.png" }
        }))
        .unwrap();

        let entity = merge_entity(core, species, vec![item]);
        assert_eq!(entity.id, 6);
        assert_eq!(entity.types, vec!["fire", "flying"]);
        assert_eq!(entity.sprite_url(), Some("art.png"));
        assert_eq!(entity.names[0].name, "Glurak");
        let detail = entity.held_items[0].detail.as_ref().unwrap();
        assert_eq!(detail.sprite.as_deref(), Some("charcoal.png"));
    }

    #[test]
    fn cache_path_is_hash_of_url() {
        let source = HttpSource::new(API_BASE, Some(PathBuf::from("/tmp/dexview-cache"))).unwrap();
        let first = source.cache_path("http", "https://pokeapi.co/api/v2/pokemon/1");
        let second = source.cache_path("http", "https://pokeapi.co/api/v2/pokemon/1");
        assert_eq!(first, second);
        let path = first.unwrap();
        assert_eq!(path.file_name().map(|name| name.len()), Some(64));

        let uncached = HttpSource::new(API_BASE, None).unwrap();
        assert!(uncached.cache_path("http", "anything").is_none());
    }
}
