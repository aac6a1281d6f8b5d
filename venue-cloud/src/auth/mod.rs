//! Authentication: admin sessions, reset tokens, rate limiting, password policy

pub mod admin_auth;
pub mod password_policy;
pub mod rate_limit;
pub mod reset_token;
pub mod session;

pub use rate_limit::{ClientIp, RateLimitConfig, RateLimiter};
pub use session::{AdminSession, TokenSigner};
