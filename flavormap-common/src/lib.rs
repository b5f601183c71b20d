//! # FlavorMap Common Library
//!
//! Shared code for the FlavorMap client and server including:
//! - The spot record (`Spot`) and its JSON coercion rules
//! - The write request (`SpotDraft`) and its field limits
//! - Local id minting
//! - Configuration loading
//! - Timestamp helpers and cuisine emoji suggestions

pub mod config;
pub mod emoji;
pub mod error;
pub mod local_id;
pub mod spot;
pub mod time;

pub use emoji::suggest_emoji;
pub use error::{Error, Result};
pub use local_id::{is_local_id, LocalIdMinter, LOCAL_ID_PREFIX};
pub use spot::{Coordinate, Spot, SpotDraft, SpotRejection};
