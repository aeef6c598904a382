//! Authorization header helpers for the Twitter/X API.
//!
//! The recent counts and recent search endpoints accept OAuth 2.0 app-only
//! authentication, which is a plain bearer token header.

/// Builds the Authorization header for OAuth 2.0 Bearer Token authentication.
///
/// # Parameters
///
/// - `bearer_token`: The Bearer Token from the Twitter Developer Portal
///
/// # Format
///
/// ```text
/// Bearer YOUR_BEARER_TOKEN_HERE
/// ```
///
/// # Example
///
/// ```rust
/// use trendroot::build_bearer_auth_header;
///
/// let header = build_bearer_auth_header("your_bearer_token");
/// assert_eq!(header, "Bearer your_bearer_token");
/// ```
pub fn build_bearer_auth_header(bearer_token: &str) -> String {
    format!("Bearer {}", bearer_token)
}
