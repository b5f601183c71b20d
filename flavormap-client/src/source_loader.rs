//! Primary/secondary source loading
//!
//! One `load()` is exactly one primary attempt and, only if that fails, one
//! secondary attempt. The caller always gets a usable result: when both fail
//! the result is empty and tagged secondary.

use std::fmt;
use std::sync::Arc;

use flavormap_common::Spot;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::error::TransportError;
use crate::transport::SpotTransport;

/// Which source a load was served from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceMode {
    /// Dynamic backend; writes are durable server-side
    Primary,
    /// Static snapshot; writes stay on this device
    Secondary,
}

impl SourceMode {
    /// Mode disclosure shown to the user
    pub fn label(&self) -> &'static str {
        match self {
            SourceMode::Primary => "API mode",
            SourceMode::Secondary => "Static mode",
        }
    }
}

impl fmt::Display for SourceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceMode::Primary => write!(f, "primary"),
            SourceMode::Secondary => write!(f, "secondary"),
        }
    }
}

/// Spots from one load, with the mode that served them
#[derive(Debug, Clone, PartialEq)]
pub struct LoadResult {
    pub mode: SourceMode,
    pub spots: Vec<Spot>,
}

pub struct SourceLoader {
    transport: Arc<dyn SpotTransport>,
}

impl SourceLoader {
    pub fn new(transport: Arc<dyn SpotTransport>) -> Self {
        Self { transport }
    }

    /// Transport shared with the write path
    pub fn transport(&self) -> &dyn SpotTransport {
        self.transport.as_ref()
    }

    pub async fn load(&self) -> LoadResult {
        match self.load_primary().await {
            Ok(spots) => {
                info!(count = spots.len(), "Loaded spots from primary source");
                LoadResult {
                    mode: SourceMode::Primary,
                    spots,
                }
            }
            Err(e) => {
                warn!(error = %e, "Primary source unavailable, falling back to static snapshot");
                let spots = match self.load_secondary().await {
                    Ok(spots) => {
                        info!(count = spots.len(), "Loaded spots from static snapshot");
                        spots
                    }
                    Err(e) => {
                        warn!(error = %e, "Static snapshot unavailable, continuing with no remote spots");
                        Vec::new()
                    }
                };
                LoadResult {
                    mode: SourceMode::Secondary,
                    spots,
                }
            }
        }
    }

    async fn load_primary(&self) -> Result<Vec<Spot>, TransportError> {
        let body = self.transport.fetch_primary().await?;
        match body.get("spots") {
            Some(Value::Array(entries)) => Ok(coerce_entries(entries, SourceMode::Primary)),
            _ => Err(TransportError::MalformedBody(
                "expected an object with a \"spots\" array".to_string(),
            )),
        }
    }

    async fn load_secondary(&self) -> Result<Vec<Spot>, TransportError> {
        match self.transport.fetch_secondary().await? {
            Value::Array(entries) => Ok(coerce_entries(&entries, SourceMode::Secondary)),
            _ => Err(TransportError::MalformedBody("expected a JSON array".to_string())),
        }
    }
}

/// Admit entries that coerce into spots, dropping the rest
fn coerce_entries(entries: &[Value], mode: SourceMode) -> Vec<Spot> {
    let mut dropped = 0usize;
    let spots: Vec<Spot> = entries
        .iter()
        .filter_map(|entry| match Spot::from_json(entry) {
            Ok(spot) => Some(spot),
            Err(reason) => {
                dropped += 1;
                warn!(source = %mode, %reason, "Dropping unusable spot");
                None
            }
        })
        .collect();

    if dropped > 0 {
        warn!(source = %mode, dropped, kept = spots.len(), "Dropped spots that failed validation");
    }
    spots
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use flavormap_common::SpotDraft;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Scripted {
        primary: Result<Value, TransportError>,
        secondary: Result<Value, TransportError>,
        primary_calls: AtomicUsize,
        secondary_calls: AtomicUsize,
    }

    impl Scripted {
        fn new(
            primary: Result<Value, TransportError>,
            secondary: Result<Value, TransportError>,
        ) -> Arc<Self> {
            Arc::new(Self {
                primary,
                secondary,
                primary_calls: AtomicUsize::new(0),
                secondary_calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl SpotTransport for Scripted {
        async fn fetch_primary(&self) -> Result<Value, TransportError> {
            self.primary_calls.fetch_add(1, Ordering::SeqCst);
            self.primary.clone()
        }

        async fn fetch_secondary(&self) -> Result<Value, TransportError> {
            self.secondary_calls.fetch_add(1, Ordering::SeqCst);
            self.secondary.clone()
        }

        async fn create_spot(&self, _draft: &SpotDraft) -> Result<Value, TransportError> {
            Err(TransportError::Unreachable("not scripted".to_string()))
        }
    }

    fn offline() -> Result<Value, TransportError> {
        Err(TransportError::Unreachable("connection refused".to_string()))
    }

    #[tokio::test]
    async fn test_primary_success_skips_secondary() {
        let transport = Scripted::new(
            Ok(json!({"spots": [{"id": "srv42", "name": "Ramen", "lat": 1.0, "lng": 2.0}]})),
            Ok(json!([])),
        );
        let loader = SourceLoader::new(transport.clone());

        let result = loader.load().await;
        assert_eq!(result.mode, SourceMode::Primary);
        assert_eq!(result.spots.len(), 1);
        assert_eq!(transport.primary_calls.load(Ordering::SeqCst), 1);
        assert_eq!(transport.secondary_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_network_failure_falls_back() {
        let transport = Scripted::new(
            offline(),
            Ok(json!([{"id": "s1", "name": "Cafe", "lat": 40.71, "lng": -74.00}])),
        );
        let loader = SourceLoader::new(transport.clone());

        let result = loader.load().await;
        assert_eq!(result.mode, SourceMode::Secondary);
        assert_eq!(result.spots[0].id, "s1");
        assert_eq!(transport.primary_calls.load(Ordering::SeqCst), 1);
        assert_eq!(transport.secondary_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_non_success_status_falls_back() {
        let transport = Scripted::new(
            Err(TransportError::Status { status: 404, message: None }),
            Ok(json!([])),
        );
        let result = SourceLoader::new(transport).load().await;
        assert_eq!(result.mode, SourceMode::Secondary);
    }

    #[tokio::test]
    async fn test_malformed_primary_body_falls_back() {
        for body in [json!([]), json!({"spots": "nope"}), json!({}), json!("html")] {
            let transport = Scripted::new(Ok(body), Ok(json!([{"id": "s1", "lat": 1, "lng": 2}])));
            let result = SourceLoader::new(transport).load().await;
            assert_eq!(result.mode, SourceMode::Secondary);
            assert_eq!(result.spots.len(), 1);
        }
    }

    #[tokio::test]
    async fn test_both_sources_failing_yields_empty_secondary() {
        let transport = Scripted::new(offline(), offline());
        let result = SourceLoader::new(transport).load().await;
        assert_eq!(result.mode, SourceMode::Secondary);
        assert!(result.spots.is_empty());
    }

    #[tokio::test]
    async fn test_non_array_snapshot_yields_empty() {
        let transport = Scripted::new(offline(), Ok(json!({"spots": []})));
        let result = SourceLoader::new(transport).load().await;
        assert_eq!(result.mode, SourceMode::Secondary);
        assert!(result.spots.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_entries_are_dropped() {
        let transport = Scripted::new(
            Ok(json!({"spots": [
                {"id": "a", "lat": 1.0, "lng": 2.0},
                {"id": "b", "lat": "abc", "lng": 2.0},
                {"name": "no id", "lat": 1.0, "lng": 2.0},
                {"id": "c", "lat": 3.0, "lng": 4.0}
            ]})),
            Ok(json!([])),
        );
        let result = SourceLoader::new(transport).load().await;
        let ids: Vec<&str> = result.spots.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(result.mode, SourceMode::Primary);
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn test_mode_labels() {
        assert_eq!(SourceMode::Primary.label(), "API mode");
        assert_eq!(SourceMode::Secondary.label(), "Static mode");
        assert_eq!(SourceMode::Secondary.to_string(), "secondary");
    }
}
