//! # FlavorMap client
//!
//! Data-source reconciliation and view synchronization for the food-spot
//! map. Spots come from a dynamic backend when it is reachable and from a
//! static snapshot when it is not; spots saved while offline live on the
//! device. Every refresh merges the two sets (device wins on id collision)
//! and brings the marker layer and the list up to date without disturbing
//! markers that already exist.

pub mod error;
pub mod local_store;
pub mod merger;
pub mod session;
pub mod source_loader;
pub mod status;
pub mod storage;
pub mod submission;
pub mod transport;
pub mod view_sync;

pub use error::{SubmitError, TransportError};
pub use local_store::{LocalStore, LOCAL_STORAGE_KEY};
pub use merger::merge;
pub use session::{RefreshReport, Session};
pub use source_loader::{LoadResult, SourceLoader, SourceMode};
pub use status::StatusMessage;
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
pub use submission::{FlowState, SpotForm, SubmitOutcome};
pub use transport::{HttpTransport, SpotTransport};
pub use view_sync::{HeadlessMap, ListEntry, MapSurface, MarkerHandle, ViewSync};
