//! 内存存储适配器
//!
//! 用于测试和本地开发，进程退出后数据丢失。

mod session_store;
mod user_store;

pub use session_store::InMemorySessionStore;
pub use user_store::InMemoryUserStore;
