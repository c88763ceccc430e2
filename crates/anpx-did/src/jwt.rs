use jsonwebtoken::{encode, EncodingKey, Header as JwtHeader};
use serde::{Deserialize, Serialize};

use crate::Error;

/// Claims carried by the short-lived admission JWT, issued optionally
/// as the last admission step. `sub` is the admitted DID;
/// `service_urls` are the entries returned by the service directory,
/// baked into the token so the gateway never has to re-query it for
/// the lifetime of the tunnel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub service_urls: Vec<String>,
    pub iat: u64,
    pub exp: u64,
}

/// Issues an RS256 JWT for an admitted tunnel. `now` and `ttl_secs` are
/// passed in rather than read from the clock so callers (and tests)
/// control expiry deterministically.
pub fn issue_jwt(
    signing_key_pem: &[u8],
    did: &str,
    service_urls: &[String],
    now_unix: u64,
    ttl_secs: u64,
) -> Result<String, Error> {
    let claims = Claims {
        sub: did.to_string(),
        service_urls: service_urls.to_vec(),
        iat: now_unix,
        exp: now_unix + ttl_secs,
    };
    let encoding_key = EncodingKey::from_rsa_pem(signing_key_pem)
        .map_err(|e| Error::ResolutionFailed(format!("invalid RS256 signing key: {e}")))?;
    encode(&JwtHeader::new(jsonwebtoken::Algorithm::RS256), &claims, &encoding_key)
        .map_err(|e| Error::ResolutionFailed(format!("failed to sign JWT: {e}")))
}
