use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Utc};
use tracing::debug;
use shared_models::auth::JwtClaims;

/// Decodes the claims segment of a JWT without verifying its signature.
///
/// The client never holds the signing secret, so this is only used to read
/// `exp` and discard tokens that are already known to be dead.
pub fn decode_claims(token: &str) -> Result<JwtClaims, String> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err("Invalid token format".to_string());
    }

    let claims_json = match URL_SAFE_NO_PAD.decode(parts[1].trim_end_matches('=')) {
        Ok(bytes) => match String::from_utf8(bytes) {
            Ok(json_str) => json_str,
            Err(_) => return Err("Invalid claims encoding".to_string()),
        },
        Err(_) => return Err("Invalid claims encoding".to_string()),
    };

    serde_json::from_str(&claims_json).map_err(|e| {
        debug!("Failed to parse claims: {}", e);
        "Invalid claims format".to_string()
    })
}

/// `Some(true)` when the token is a JWT whose `exp` lies before `now`.
/// `None` when the token is opaque or carries no expiry.
pub fn is_expired_at(token: &str, now: DateTime<Utc>) -> Option<bool> {
    let claims = decode_claims(token).ok()?;
    let exp = claims.exp?;
    let now = now.timestamp().max(0) as u64;
    if exp < now {
        debug!("Token expired at {} (now: {})", exp, now);
    }
    Some(exp < now)
}

pub fn is_expired(token: &str) -> Option<bool> {
    is_expired_at(token, Utc::now())
}
