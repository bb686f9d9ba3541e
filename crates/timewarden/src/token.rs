use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::error::AuthError;

/// HS256 identity tokens.
///
/// Notes:
/// - base64url encoding WITHOUT padding.
/// - Signature verification uses `Hmac::verify_slice` before any claim is
///   trusted.
/// - Verification failures are uniform: decode, signature, and expiry
///   problems all surface as `AuthError::InvalidToken`.

#[derive(Debug, Serialize, Deserialize)]
struct TokenHeader {
    alg: String,
    typ: String,
}

/// Claims embedded in an identity token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Owning user's id.
    pub sub: String,
    /// Unix timestamp (seconds).
    pub iat: i64,
    /// Unix timestamp (seconds).
    pub exp: i64,
}

fn b64url_encode(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

fn b64url_decode(s: &str) -> Result<Vec<u8>, AuthError> {
    URL_SAFE_NO_PAD
        .decode(s.as_bytes())
        .map_err(|_| AuthError::InvalidToken)
}

/// Mint a signed token for `user_id`, valid for `ttl_secs` from `now`.
pub fn issue(secret: &[u8], user_id: &str, now: i64, ttl_secs: i64) -> Result<String, AuthError> {
    let header = TokenHeader {
        alg: "HS256".to_string(),
        typ: "JWT".to_string(),
    };
    let claims = Claims {
        sub: user_id.to_string(),
        iat: now,
        exp: now + ttl_secs,
    };

    let header_json =
        serde_json::to_vec(&header).map_err(|e| AuthError::Signing(e.to_string()))?;
    let claims_json =
        serde_json::to_vec(&claims).map_err(|e| AuthError::Signing(e.to_string()))?;

    let signing_input = format!("{}.{}", b64url_encode(&header_json), b64url_encode(&claims_json));

    let mut mac = Hmac::<Sha256>::new_from_slice(secret)
        .map_err(|e| AuthError::Signing(format!("invalid HMAC key: {e}")))?;
    mac.update(signing_input.as_bytes());
    let signature = mac.finalize().into_bytes();

    Ok(format!("{signing_input}.{}", b64url_encode(&signature)))
}

/// Verify signature and expiry; return the subject user id.
pub fn verify(secret: &[u8], token: &str, now: i64) -> Result<String, AuthError> {
    let token = token.trim();
    let mut parts = token.split('.');
    let Some(header_b64) = parts.next() else {
        return Err(AuthError::InvalidToken);
    };
    let Some(claims_b64) = parts.next() else {
        return Err(AuthError::InvalidToken);
    };
    let Some(sig_b64) = parts.next() else {
        return Err(AuthError::InvalidToken);
    };
    if parts.next().is_some() {
        return Err(AuthError::InvalidToken);
    }

    let header_raw = b64url_decode(header_b64)?;
    let header: TokenHeader =
        serde_json::from_slice(&header_raw).map_err(|_| AuthError::InvalidToken)?;
    if header.alg != "HS256" || header.typ != "JWT" {
        return Err(AuthError::InvalidToken);
    }

    let mut mac =
        Hmac::<Sha256>::new_from_slice(secret).map_err(|_| AuthError::InvalidToken)?;
    mac.update(format!("{header_b64}.{claims_b64}").as_bytes());
    let signature = b64url_decode(sig_b64)?;
    mac.verify_slice(&signature)
        .map_err(|_| AuthError::InvalidToken)?;

    let claims_raw = b64url_decode(claims_b64)?;
    let claims: Claims =
        serde_json::from_slice(&claims_raw).map_err(|_| AuthError::InvalidToken)?;

    if claims.exp <= now {
        return Err(AuthError::InvalidToken);
    }

    Ok(claims.sub)
}
