//! chat-bootstrap - 服务启动骨架

mod infrastructure;
mod interceptor;
mod retry;
mod runtime;
mod starter;

pub use infrastructure::*;
pub use interceptor::*;
pub use retry::*;
pub use runtime::*;
pub use starter::*;
