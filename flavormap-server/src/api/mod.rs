//! HTTP API handlers for flavormap-server

pub mod error;
pub mod health;
pub mod spots;
pub mod suggest;

pub use error::ApiError;
pub use health::health_routes;
pub use spots::{create_spot, list_spots, snapshot};
pub use suggest::suggest;
