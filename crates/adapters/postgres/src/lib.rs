//! chat-adapter-postgres - PostgreSQL 适配器

mod connection;
mod migration;
mod schema;
mod session_store;
mod user_store;

pub use connection::*;
pub use migration::*;
pub use schema::auth_migrations;
pub use session_store::PgSessionStore;
pub use user_store::PgUserStore;
