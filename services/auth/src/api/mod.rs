//! API 层

pub mod grpc;
