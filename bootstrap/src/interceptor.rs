//! gRPC Interceptors

use chat_auth_core::{AccessClaims, TokenIssuer};
use chat_errors::{AuthError, AuthResult};
use tonic::{Request, Status};

/// 访问令牌拦截器
///
/// 供下游服务挂载；校验通过后把 [`AccessClaims`] 放入请求扩展。
#[allow(clippy::result_large_err)]
pub fn auth_interceptor(
    token_issuer: &TokenIssuer,
    mut request: Request<()>,
) -> Result<Request<()>, Status> {
    let token = extract_token(&request)?;

    let claims = token_issuer.verify_access_token(token)?;

    request.extensions_mut().insert(claims);

    Ok(request)
}

#[allow(clippy::result_large_err)]
fn extract_token<T>(request: &Request<T>) -> Result<&str, Status> {
    let auth_header = request
        .metadata()
        .get("authorization")
        .ok_or_else(|| Status::unauthenticated("Missing authorization header"))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| Status::unauthenticated("Invalid authorization header"))?;

    auth_str
        .strip_prefix("Bearer ")
        .ok_or_else(|| Status::unauthenticated("Invalid authorization scheme"))
}

/// 从请求扩展中获取 Claims
pub fn get_claims<T>(request: &Request<T>) -> AuthResult<&AccessClaims> {
    request
        .extensions()
        .get::<AccessClaims>()
        .ok_or_else(|| AuthError::invalid_access_token("no claims found in request"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chat_common::UserId;
    use chrono::{Duration, Utc};
    use secrecy::Secret;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(&Secret::new("interceptor-test-secret".to_string()))
    }

    fn request_with(header: &str) -> Request<()> {
        let mut request = Request::new(());
        request
            .metadata_mut()
            .insert("authorization", header.parse().unwrap());
        request
    }

    #[test]
    fn test_valid_token_inserts_claims() {
        let issuer = issuer();
        let token = issuer
            .issue_access_token(UserId::new(9), "a@b.com", Duration::minutes(15), Utc::now())
            .unwrap();

        let request = auth_interceptor(&issuer, request_with(&format!("Bearer {}", token.token)))
            .unwrap();

        let claims = get_claims(&request).unwrap();
        assert_eq!(claims.user_id(), UserId::new(9));
        assert_eq!(claims.email, "a@b.com");
    }

    #[test]
    fn test_missing_header_rejected() {
        let status = auth_interceptor(&issuer(), Request::new(())).unwrap_err();
        assert_eq!(status.code(), tonic::Code::Unauthenticated);
    }

    #[test]
    fn test_wrong_scheme_rejected() {
        let status = auth_interceptor(&issuer(), request_with("Basic abc")).unwrap_err();
        assert_eq!(status.code(), tonic::Code::Unauthenticated);
    }

    #[test]
    fn test_expired_token_rejected() {
        let issuer = issuer();
        let token = issuer
            .issue_access_token(
                UserId::new(9),
                "a@b.com",
                Duration::minutes(15),
                Utc::now() - Duration::hours(1),
            )
            .unwrap();

        let status =
            auth_interceptor(&issuer, request_with(&format!("Bearer {}", token.token))).unwrap_err();
        assert_eq!(status.code(), tonic::Code::Unauthenticated);
    }

    #[test]
    fn test_get_claims_without_interceptor() {
        let request = Request::new(());
        assert!(get_claims(&request).is_err());
    }
}
