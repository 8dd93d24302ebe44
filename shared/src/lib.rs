//! Shared types for the Cottage booking node
//!
//! Record models, change-notification messages and the unified error type,
//! used by the edge node and by anything that reads the same stored JSON.

pub mod error;
pub mod message;
pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

// Change notification re-exports (for convenient access)
pub use message::{ChangeNotice, ChangeSignal, EventType, StorageEvent, ViewId};

pub use error::{AppError, AppResult, ErrorCategory, ErrorCode};
