//! Identity: password credentials and signed session tokens.

mod config;
mod password;
mod token;

pub use config::{TokenConfig, TOKEN_TTL_HOURS};
pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenError, TokenService};

/// Cookie the HTTP layer uses to carry the session token.
pub const TOKEN_COOKIE: &str = "tokenJWT";
