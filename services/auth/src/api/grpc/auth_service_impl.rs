//! Auth gRPC 实现

use std::sync::Arc;

use tonic::{Request, Response, Status};

use super::messages::*;
use super::proto::auth_server::Auth;
use crate::application::AuthService;

/// Auth gRPC 服务
///
/// 空字段在进入编排器之前以 `InvalidArgument` 拒绝。
#[derive(Clone)]
pub struct AuthGrpcService {
    service: Arc<AuthService>,
}

impl AuthGrpcService {
    pub fn new(service: Arc<AuthService>) -> Self {
        Self { service }
    }
}

#[allow(clippy::result_large_err)]
fn required(value: &str, message: &'static str) -> Result<(), Status> {
    if value.is_empty() {
        return Err(Status::invalid_argument(message));
    }
    Ok(())
}

#[tonic::async_trait]
impl Auth for AuthGrpcService {
    async fn register(
        &self,
        request: Request<RegisterRequest>,
    ) -> Result<Response<RegisterResponse>, Status> {
        let req = request.into_inner();
        required(&req.email, "email is required")?;
        required(&req.password, "password is required")?;
        required(&req.name, "name is required")?;

        let user_id = self
            .service
            .register(&req.email, &req.password, &req.name)
            .await?;

        Ok(Response::new(RegisterResponse {
            user_id: user_id.as_i64(),
        }))
    }

    async fn login(
        &self,
        request: Request<LoginRequest>,
    ) -> Result<Response<LoginResponse>, Status> {
        let req = request.into_inner();
        required(&req.email, "email is required")?;
        required(&req.password, "password is required")?;

        let tokens = self.service.login(&req.email, &req.password).await?;

        Ok(Response::new(LoginResponse {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            access_expires_at: Some(to_timestamp(tokens.access_expires_at)),
            refresh_expires_at: Some(to_timestamp(tokens.refresh_expires_at)),
        }))
    }

    async fn refresh_access_token(
        &self,
        request: Request<RefreshAccessTokenRequest>,
    ) -> Result<Response<RefreshAccessTokenResponse>, Status> {
        let req = request.into_inner();
        required(&req.refresh_token, "refresh token is required")?;

        let grant = self.service.refresh_access_token(&req.refresh_token).await?;

        Ok(Response::new(RefreshAccessTokenResponse {
            access_token: grant.access_token,
            access_expires_at: Some(to_timestamp(grant.access_expires_at)),
        }))
    }

    async fn logout(
        &self,
        request: Request<LogoutRequest>,
    ) -> Result<Response<LogoutResponse>, Status> {
        let req = request.into_inner();
        required(&req.refresh_token, "refresh token is required")?;

        self.service.logout(&req.refresh_token).await?;

        Ok(Response::new(LogoutResponse {}))
    }
}
