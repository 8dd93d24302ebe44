//! 客户留言

pub mod service;

pub use service::ChatService;
