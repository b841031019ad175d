use super::errors::AuthError;

pub const BEARER_PREFIX: &str = "Bearer ";

/// Token carried by an `Authorization: Bearer <token>` header value.
/// The prefix is matched case-sensitively.
pub fn extract_bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    let token = header
        .and_then(|h| h.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .ok_or(AuthError::MissingCredentials)?;
    if token.is_empty() {
        return Err(AuthError::MissingCredentials);
    }
    Ok(token)
}
