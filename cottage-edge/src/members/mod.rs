//! 会员账户

pub mod service;

pub use service::{MemberService, generate_temp_password};
