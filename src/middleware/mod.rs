pub mod auth;
pub mod response;
pub mod validate;

pub use auth::{jwt_auth_middleware, AuthGate, AuthUser};
pub use response::Envelope;
pub use validate::{Validate, Validated};
