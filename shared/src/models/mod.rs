//! Data models
//!
//! Shared between the edge node and the views that read the same stored JSON.
//! Field names follow the stored layout (`camelCase`), so records written by
//! either side stay readable by the other.

pub mod booking;
pub mod category;
pub mod chat;
pub mod class_record;
pub mod notification;
pub mod user;

// Re-exports
pub use booking::*;
pub use category::*;
pub use chat::*;
pub use class_record::*;
pub use notification::*;
pub use user::*;
