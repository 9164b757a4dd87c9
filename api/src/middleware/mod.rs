pub mod auth;
pub mod cors;
pub mod request_context;
pub mod security;

pub use auth::{AuthContext, JwtAuth};
pub use cors::create_cors;
pub use request_context::RequestContext;
pub use security::SecurityMiddleware;
