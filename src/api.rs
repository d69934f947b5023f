//! PokeAPI client: the only code in the crate that touches the network

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::config::CatalogConfig;
use crate::state::{ItemDetail, ItemReference, ItemStat};

#[derive(thiserror::Error, Clone, Debug, PartialEq)]
pub enum SourceError {
    /// Request failed, timed out, or came back with a non-success status.
    #[error("request failed: {0}")]
    Network(String),
    #[error("unexpected response: {0}")]
    Decode(String),
}

/// One page of the paged list endpoint.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReferencePage {
    pub results: Vec<ItemReference>,
    pub next: Option<String>,
}

/// Read access to the upstream catalog.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn list_page(&self, offset: usize, limit: usize) -> Result<ReferencePage, SourceError>;

    async fn fetch_detail(&self, reference: &ItemReference) -> Result<ItemDetail, SourceError>;

    async fn fetch_detail_by_id(&self, id: &str) -> Result<ItemDetail, SourceError>;
}

/// Follow the next-page cursor until the endpoint runs out.
pub async fn list_all_references<S>(
    source: &S,
    batch: usize,
) -> Result<Vec<ItemReference>, SourceError>
where
    S: CatalogSource + ?Sized,
{
    let batch = batch.max(1);
    let mut references = Vec::new();
    let mut offset = 0;
    loop {
        let page = source.list_page(offset, batch).await?;
        let fetched = page.results.len();
        references.extend(page.results);
        if page.next.is_none() || fetched == 0 {
            break;
        }
        offset += fetched;
    }
    Ok(references)
}

#[derive(Clone, Debug, Deserialize)]
struct NamedResource {
    name: String,
    url: String,
}

#[derive(Clone, Debug, Deserialize)]
struct ListResponse {
    results: Vec<NamedResource>,
    next: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonResponse {
    id: u16,
    name: String,
    height: u16,
    weight: u16,
    base_experience: Option<u16>,
    types: Vec<PokemonTypeSlot>,
    stats: Vec<PokemonStatSlot>,
    abilities: Vec<PokemonAbilitySlot>,
    moves: Vec<PokemonMoveSlot>,
    sprites: serde_json::Value,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonTypeSlot {
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
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonMoveSlot {
    #[serde(rename = "move")]
    move_info: NamedResource,
}

impl From<NamedResource> for ItemReference {
    fn from(resource: NamedResource) -> Self {
        ItemReference {
            name: resource.name,
            url: resource.url,
        }
    }
}

impl From<PokemonResponse> for ItemDetail {
    fn from(response: PokemonResponse) -> Self {
        ItemDetail {
            id: response.id,
            sprite_url: pointer_string(&response.sprites, "/front_default"),
            name: response.name,
            height: response.height,
            weight: response.weight,
            base_experience: response.base_experience,
            types: response
                .types
                .into_iter()
                .map(|slot| slot.type_info.name)
                .collect(),
            abilities: response
                .abilities
                .into_iter()
                .map(|slot| slot.ability.name)
                .collect(),
            stats: response
                .stats
                .into_iter()
                .map(|slot| ItemStat {
                    name: slot.stat.name,
                    value: slot.base_stat,
                })
                .collect(),
            moves: response
                .moves
                .into_iter()
                .map(|slot| slot.move_info.name)
                .collect(),
        }
    }
}

pub struct PokeApiClient {
    client: reqwest::Client,
    config: CatalogConfig,
}

impl PokeApiClient {
    pub fn new(config: CatalogConfig) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("pokelist/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| SourceError::Network(err.to_string()))?;
        Ok(Self { client, config })
    }

    async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, SourceError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| SourceError::Network(err.to_string()))?;
        let response = response
            .error_for_status()
            .map_err(|err| SourceError::Network(err.to_string()))?;
        let bytes = response
            .bytes()
            .await
            .map_err(|err| SourceError::Network(err.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|err| SourceError::Decode(err.to_string()))
    }
}

#[async_trait]
impl CatalogSource for PokeApiClient {
    async fn list_page(&self, offset: usize, limit: usize) -> Result<ReferencePage, SourceError> {
        let url = self
            .config
            .endpoint(&format!("pokemon?offset={offset}&limit={limit}"));
        let response: ListResponse = self.fetch_json(&url).await?;
        Ok(ReferencePage {
            results: response.results.into_iter().map(Into::into).collect(),
            next: response.next,
        })
    }

    async fn fetch_detail(&self, reference: &ItemReference) -> Result<ItemDetail, SourceError> {
        let response: PokemonResponse = self.fetch_json(&reference.url).await?;
        Ok(response.into())
    }

    async fn fetch_detail_by_id(&self, id: &str) -> Result<ItemDetail, SourceError> {
        let url = self.config.endpoint(&format!("pokemon/{}/", id.trim()));
        let response: PokemonResponse = self.fetch_json(&url).await?;
        Ok(response.into())
    }
}

fn pointer_string(value: &serde_json::Value, pointer: &str) -> Option<String> {
    value
        .pointer(pointer)
        .and_then(|val| val.as_str())
        .map(|s| s.to_string())
}
