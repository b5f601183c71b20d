//! Shared fixtures for client integration tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use flavormap_client::{
    HeadlessMap, LocalStore, MemoryStorage, Session, SourceLoader, SpotForm, SpotTransport,
    TransportError,
};
use flavormap_common::SpotDraft;
use serde_json::{json, Value};

/// Transport whose responses can be rescripted between calls
#[derive(Default)]
pub struct FakeTransport {
    script: Mutex<Script>,
    pub primary_calls: AtomicUsize,
    pub secondary_calls: AtomicUsize,
    pub create_calls: AtomicUsize,
}

struct Script {
    primary: Result<Value, TransportError>,
    secondary: Result<Value, TransportError>,
    create: Result<Value, TransportError>,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            primary: Err(refused()),
            secondary: Err(refused()),
            create: Err(refused()),
        }
    }
}

pub fn refused() -> TransportError {
    TransportError::Unreachable("connection refused".to_string())
}

impl FakeTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_primary(&self, response: Result<Value, TransportError>) {
        self.script.lock().unwrap().primary = response;
    }

    pub fn set_secondary(&self, response: Result<Value, TransportError>) {
        self.script.lock().unwrap().secondary = response;
    }

    pub fn set_create(&self, response: Result<Value, TransportError>) {
        self.script.lock().unwrap().create = response;
    }

    pub fn creates(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SpotTransport for FakeTransport {
    async fn fetch_primary(&self) -> Result<Value, TransportError> {
        self.primary_calls.fetch_add(1, Ordering::SeqCst);
        self.script.lock().unwrap().primary.clone()
    }

    async fn fetch_secondary(&self) -> Result<Value, TransportError> {
        self.secondary_calls.fetch_add(1, Ordering::SeqCst);
        self.script.lock().unwrap().secondary.clone()
    }

    async fn create_spot(&self, _draft: &SpotDraft) -> Result<Value, TransportError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.script.lock().unwrap().create.clone()
    }
}

/// Session over a fake transport, in-memory storage and a headless map
pub fn session(transport: Arc<FakeTransport>) -> Session<HeadlessMap> {
    session_with_store(transport, LocalStore::new(Box::new(MemoryStorage::new())))
}

pub fn session_with_store(
    transport: Arc<FakeTransport>,
    store: LocalStore,
) -> Session<HeadlessMap> {
    Session::new(SourceLoader::new(transport), store, HeadlessMap::new())
}

pub fn spot_json(id: &str, name: &str, lat: f64, lng: f64) -> Value {
    json!({
        "id": id,
        "name": name,
        "cuisine": "coffee",
        "emoji": "☕",
        "note": "",
        "lat": lat,
        "lng": lng
    })
}

pub fn form(name: &str, lat: &str, lng: &str) -> SpotForm {
    SpotForm {
        name: name.to_string(),
        cuisine: "sandwiches".to_string(),
        emoji: "🥪".to_string(),
        note: String::new(),
        lat: lat.to_string(),
        lng: lng.to_string(),
    }
}
