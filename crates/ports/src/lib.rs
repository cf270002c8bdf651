//! ports - 抽象 trait 层
//!
//! 认证核心依赖的存储与观测能力

mod events;
mod models;
mod session_store;
mod store_error;
mod user_store;

pub use events::*;
pub use models::*;
pub use session_store::*;
pub use store_error::*;
pub use user_store::*;
