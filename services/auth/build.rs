use tonic_build::manual::{Builder, Method, Service};

fn method(name: &str, route: &str, input: &str, output: &str) -> Method {
    Method::builder()
        .name(name)
        .route_name(route)
        .input_type(format!("crate::api::grpc::{}", input))
        .output_type(format!("crate::api::grpc::{}", output))
        .codec_path("tonic::codec::ProstCodec")
        .build()
}

fn main() {
    let service = Service::builder()
        .name("Auth")
        .package("chat.auth.v1")
        .method(method("register", "Register", "RegisterRequest", "RegisterResponse"))
        .method(method("login", "Login", "LoginRequest", "LoginResponse"))
        .method(method(
            "refresh_access_token",
            "RefreshAccessToken",
            "RefreshAccessTokenRequest",
            "RefreshAccessTokenResponse",
        ))
        .method(method("logout", "Logout", "LogoutRequest", "LogoutResponse"))
        .build();

    Builder::new().build_client(false).compile(&[service]);

    println!("cargo:rerun-if-changed=build.rs");
}
