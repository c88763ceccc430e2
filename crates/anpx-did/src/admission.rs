use std::sync::Arc;
use std::time::Duration;

use anpx_registry::ServiceDirectory;
use time::OffsetDateTime;

use crate::header::{parse_authorization_header, DidWbaChallenge};
use crate::jwt::issue_jwt;
use crate::nonce::NonceCache;
use crate::resolver::DidResolver;
use crate::timestamp::check_window;
use crate::verify::verify_signature;
use crate::Error;

/// Optional RS256 JWT issuance, the last step of admission.
#[derive(Clone)]
pub struct JwtIssuer {
    pub signing_key_pem: Arc<Vec<u8>>,
    pub ttl_secs: u64,
}

/// The outcome of a successful admission: the caller's authorized
/// service URLs, and a JWT if an issuer was configured.
#[derive(Debug, Clone)]
pub struct Admitted {
    pub did: String,
    pub service_urls: Vec<String>,
    pub jwt: Option<String>,
}

/// Runs the full six-step DID-WBA admission flow: parse the header,
/// check the timestamp window, check and consume the nonce, resolve
/// the DID document, verify the signature bound to `domain`, and
/// query the service directory. Returns
/// [`Error::NoAuthorizedServices`] if the DID resolves and verifies
/// but the directory has nothing for it — tunnels with no routable
/// services are refused just like any other admission failure.
pub async fn admit(
    authorization_header: &str,
    domain: &str,
    nonce_cache: &NonceCache,
    resolver: &dyn DidResolver,
    service_directory: &dyn ServiceDirectory,
    jwt_issuer: Option<&JwtIssuer>,
) -> Result<Admitted, Error> {
    let challenge: DidWbaChallenge = parse_authorization_header(authorization_header)?;

    check_window(&challenge.timestamp, now())?;

    nonce_cache.check_and_use(&challenge.nonce)?;

    let document = resolver.resolve(&challenge.did).await?;

    verify_signature(&document, &challenge, domain)?;

    let service_urls = service_directory.authorized_service_urls(&challenge.did).await;
    if service_urls.is_empty() {
        return Err(Error::NoAuthorizedServices);
    }

    let jwt = match jwt_issuer {
        Some(issuer) => Some(issue_jwt(
            &issuer.signing_key_pem,
            &challenge.did,
            &service_urls,
            unix_now(),
            issuer.ttl_secs,
        )?),
        None => None,
    };

    Ok(Admitted {
        did: challenge.did,
        service_urls,
        jwt,
    })
}

fn now() -> OffsetDateTime {
    OffsetDateTime::now_utc()
}

fn unix_now() -> u64 {
    now().unix_timestamp().max(0) as u64
}

/// Default nonce window, matching the timestamp admission window.
pub fn default_nonce_cache() -> NonceCache {
    NonceCache::new(Duration::from_secs(crate::timestamp::WINDOW_SECS as u64), 100_000)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::{DidDocument, StaticDidResolver, VerificationMethod};
    use anpx_registry::StaticServiceDirectory;
    use base64::Engine;
    use ed25519_dalek::{Signer, SigningKey};
    use time::format_description::well_known::Rfc3339;

    const ED25519_KEY_TYPE: &str = "Ed25519VerificationKey2020";

    fn build_header(signing_key: &SigningKey, domain: &str, nonce: &str) -> String {
        let timestamp = OffsetDateTime::now_utc().format(&Rfc3339).unwrap();
        let did = "did:web:example.test";
        let method = "did:web:example.test#key-1";
        let mut challenge = DidWbaChallenge {
            did: did.to_string(),
            nonce: nonce.to_string(),
            timestamp,
            verification_method: method.to_string(),
            signature: String::new(),
        };
        let payload = crate::verify::signing_payload(&challenge, domain);
        let signature = signing_key.sign(&payload);
        challenge.signature =
            base64::engine::general_purpose::STANDARD.encode(signature.to_bytes());
        format!(
            r#"DIDWba did="{}", nonce="{}", timestamp="{}", verification_method="{}", signature="{}""#,
            challenge.did, challenge.nonce, challenge.timestamp, challenge.verification_method, challenge.signature
        )
    }

    fn resolver_with(signing_key: &SigningKey) -> StaticDidResolver {
        StaticDidResolver::new().with_document(DidDocument {
            id: "did:web:example.test".to_string(),
            verification_methods: vec![VerificationMethod {
                id: "did:web:example.test#key-1".to_string(),
                key_type: ED25519_KEY_TYPE.to_string(),
                public_key_base64: base64::engine::general_purpose::STANDARD
                    .encode(signing_key.verifying_key().to_bytes()),
            }],
        })
    }

    #[tokio::test]
    async fn full_admission_succeeds_and_returns_service_urls() {
        let signing_key = SigningKey::from_bytes(&[3u8; 32]);
        let header = build_header(&signing_key, "gateway.example.test", "nonce-1");
        let nonce_cache = default_nonce_cache();
        let resolver = resolver_with(&signing_key);
        let directory = StaticServiceDirectory::new()
            .with_entry("did:web:example.test", vec!["http://localhost:9000".to_string()]);

        let admitted = admit(
            &header,
            "gateway.example.test",
            &nonce_cache,
            &resolver,
            &directory,
            None,
        )
        .await
        .unwrap();

        assert_eq!(admitted.did, "did:web:example.test");
        assert_eq!(admitted.service_urls, vec!["http://localhost:9000".to_string()]);
        assert!(admitted.jwt.is_none());
    }

    #[tokio::test]
    async fn replayed_nonce_is_rejected_on_second_admission() {
        let signing_key = SigningKey::from_bytes(&[3u8; 32]);
        let nonce_cache = default_nonce_cache();
        let resolver = resolver_with(&signing_key);
        let directory = StaticServiceDirectory::new()
            .with_entry("did:web:example.test", vec!["http://localhost:9000".to_string()]);

        let header = build_header(&signing_key, "gateway.example.test", "nonce-reused");
        admit(&header, "gateway.example.test", &nonce_cache, &resolver, &directory, None)
            .await
            .unwrap();

        let header2 = build_header(&signing_key, "gateway.example.test", "nonce-reused");
        let err = admit(&header2, "gateway.example.test", &nonce_cache, &resolver, &directory, None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NonceReused));
    }

    #[tokio::test]
    async fn unauthorized_did_with_no_service_urls_is_rejected() {
        let signing_key = SigningKey::from_bytes(&[3u8; 32]);
        let header = build_header(&signing_key, "gateway.example.test", "nonce-2");
        let nonce_cache = default_nonce_cache();
        let resolver = resolver_with(&signing_key);
        let directory = StaticServiceDirectory::new();

        let err = admit(&header, "gateway.example.test", &nonce_cache, &resolver, &directory, None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NoAuthorizedServices));
    }

    #[tokio::test]
    async fn signature_bound_to_wrong_domain_is_rejected() {
        let signing_key = SigningKey::from_bytes(&[3u8; 32]);
        let header = build_header(&signing_key, "gateway.example.test", "nonce-3");
        let nonce_cache = default_nonce_cache();
        let resolver = resolver_with(&signing_key);
        let directory = StaticServiceDirectory::new()
            .with_entry("did:web:example.test", vec!["http://localhost:9000".to_string()]);

        let err = admit(&header, "impostor.example.test", &nonce_cache, &resolver, &directory, None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::SignatureInvalid));
    }
}
