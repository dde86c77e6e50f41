pub mod jwt;
pub mod middleware;
pub mod password;
pub mod rate_limit;

/// Name of the cookie carrying the session token.
pub const TOKEN_COOKIE: &str = "token";
