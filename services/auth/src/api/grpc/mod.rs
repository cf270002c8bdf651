//! gRPC API 实现

mod auth_service_impl;
mod messages;

#[allow(clippy::all)]
mod proto {
    include!(concat!(env!("OUT_DIR"), "/chat.auth.v1.Auth.rs"));
}

pub use auth_service_impl::*;
pub use messages::*;
pub use proto::auth_server::{Auth, AuthServer};
