//! Demonstration endpoints for public and token-protected access

use super::AuthenticatedUser;

/// GET /test/public
pub async fn public_endpoint() -> &'static str {
    "This is a public endpoint - no authentication required"
}

/// GET /test/protected
pub async fn protected_endpoint(user: AuthenticatedUser) -> String {
    tracing::debug!(email = %user.email, name = %user.name, "Protected endpoint accessed");

    format!(
        "This is a protected endpoint. Current user: {}",
        user.email
    )
}
