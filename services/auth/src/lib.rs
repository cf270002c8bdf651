//! auth-service - 认证服务
//!
//! 注册、登录、刷新访问令牌与登出。

pub mod api;
pub mod application;
pub mod infrastructure;
