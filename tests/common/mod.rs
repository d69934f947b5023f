//! In-memory catalog used by the integration tests

#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use pokelist::api::{CatalogSource, ReferencePage, SourceError};
use pokelist::state::{ItemDetail, ItemReference};

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    List { offset: usize, limit: usize },
    Detail(String),
}

/// Serves a fixed list of names and records every request.
pub struct ScriptedSource {
    names: Vec<String>,
    fail_on: Option<String>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedSource {
    pub fn new(names: &[&str]) -> Self {
        Self {
            names: names.iter().map(|name| name.to_string()).collect(),
            fail_on: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// `count` generated names: `mon001`, `mon002`, ...
    pub fn numbered(count: usize) -> Self {
        let names: Vec<String> = (1..=count).map(|idx| format!("mon{idx:03}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        Self::new(&refs)
    }

    pub fn failing_on(mut self, name: &str) -> Self {
        self.fail_on = Some(name.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn detail_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, Call::Detail(_)))
            .count()
    }

    pub fn references(&self) -> Vec<ItemReference> {
        self.names.iter().map(|name| reference(name)).collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn detail_for(&self, name: &str) -> Result<ItemDetail, SourceError> {
        if self.fail_on.as_deref() == Some(name) {
            return Err(SourceError::Network(format!("{name}: connection reset")));
        }
        let position = self
            .names
            .iter()
            .position(|candidate| candidate == name)
            .ok_or_else(|| SourceError::Network(format!("404 Not Found: {name}")))?;
        Ok(detail(position as u16 + 1, name))
    }
}

#[async_trait]
impl CatalogSource for ScriptedSource {
    async fn list_page(&self, offset: usize, limit: usize) -> Result<ReferencePage, SourceError> {
        self.record(Call::List { offset, limit });
        let start = offset.min(self.names.len());
        let end = (offset + limit).min(self.names.len());
        let next = if end < self.names.len() {
            Some(format!("next?offset={end}&limit={limit}"))
        } else {
            None
        };
        Ok(ReferencePage {
            results: self.names[start..end]
                .iter()
                .map(|name| reference(name))
                .collect(),
            next,
        })
    }

    async fn fetch_detail(&self, reference: &ItemReference) -> Result<ItemDetail, SourceError> {
        self.record(Call::Detail(reference.name.clone()));
        self.detail_for(&reference.name)
    }

    async fn fetch_detail_by_id(&self, id: &str) -> Result<ItemDetail, SourceError> {
        self.record(Call::Detail(id.to_string()));
        match id.parse::<usize>() {
            Ok(number) if number >= 1 && number <= self.names.len() => {
                let name = self.names[number - 1].clone();
                self.detail_for(&name)
            }
            _ => self.detail_for(id),
        }
    }
}

pub fn reference(name: &str) -> ItemReference {
    ItemReference {
        name: name.to_string(),
        url: format!("https://pokeapi.test/api/v2/pokemon/{name}/"),
    }
}

pub fn detail(id: u16, name: &str) -> ItemDetail {
    ItemDetail {
        id,
        name: name.to_string(),
        sprite_url: Some(format!("https://img.test/{id}.png")),
        height: 7,
        weight: 69,
        base_experience: Some(64),
        types: vec!["grass".into(), "poison".into()],
        abilities: vec!["overgrow".into()],
        stats: Vec::new(),
        moves: vec!["tackle".into()],
    }
}
