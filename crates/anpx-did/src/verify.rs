use base64::Engine;
use ed25519_dalek::{Signature, Verifier, VerifyingKey};

use crate::header::DidWbaChallenge;
use crate::resolver::{DidDocument, VerificationMethod};
use crate::Error;

const ED25519_KEY_TYPE: &str = "Ed25519VerificationKey2020";

/// Builds the exact byte string the client must have signed: the DID,
/// nonce, timestamp, and the effective domain of the request being
/// admitted, joined by `.`, so a challenge minted for one gateway
/// cannot be replayed against another.
pub fn signing_payload(challenge: &DidWbaChallenge, domain: &str) -> Vec<u8> {
    format!(
        "{}.{}.{}.{}",
        challenge.did, challenge.nonce, challenge.timestamp, domain
    )
    .into_bytes()
}

/// Verifies `challenge.signature` against `document`'s verification
/// method named by `challenge.verification_method`, over the payload
/// bound to `domain`.
///
/// Only `Ed25519VerificationKey2020` methods are supported; anything
/// else is rejected with [`Error::UnsupportedVerificationMethod`]
/// rather than guessed at (see DESIGN.md).
pub fn verify_signature(
    document: &DidDocument,
    challenge: &DidWbaChallenge,
    domain: &str,
) -> Result<(), Error> {
    let method = document
        .verification_method(&challenge.verification_method)
        .ok_or_else(|| Error::UnknownVerificationMethod(challenge.verification_method.clone()))?;

    let verifying_key = ed25519_verifying_key(method)?;

    let signature_bytes = base64::engine::general_purpose::STANDARD
        .decode(challenge.signature.as_bytes())
        .map_err(|_| Error::SignatureInvalid)?;
    let signature_bytes: [u8; 64] = signature_bytes
        .as_slice()
        .try_into()
        .map_err(|_| Error::SignatureInvalid)?;
    let signature = Signature::from_bytes(&signature_bytes);

    let payload = signing_payload(challenge, domain);
    verifying_key
        .verify(&payload, &signature)
        .map_err(|_| Error::SignatureInvalid)
}

fn ed25519_verifying_key(method: &VerificationMethod) -> Result<VerifyingKey, Error> {
    if method.key_type != ED25519_KEY_TYPE {
        return Err(Error::UnsupportedVerificationMethod(method.key_type.clone()));
    }
    let key_bytes = base64::engine::general_purpose::STANDARD
        .decode(method.public_key_base64.as_bytes())
        .map_err(|_| Error::SignatureInvalid)?;
    let key_bytes: [u8; 32] = key_bytes
        .as_slice()
        .try_into()
        .map_err(|_| Error::SignatureInvalid)?;
    VerifyingKey::from_bytes(&key_bytes).map_err(|_| Error::SignatureInvalid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::DidDocument;
    use ed25519_dalek::{Signer, SigningKey};

    fn signing_key() -> SigningKey {
        SigningKey::from_bytes(&[7u8; 32])
    }

    fn document_for(signing_key: &SigningKey, method_id: &str) -> DidDocument {
        DidDocument {
            id: "did:web:example.test".to_string(),
            verification_methods: vec![VerificationMethod {
                id: method_id.to_string(),
                key_type: ED25519_KEY_TYPE.to_string(),
                public_key_base64: base64::engine::general_purpose::STANDARD
                    .encode(signing_key.verifying_key().to_bytes()),
            }],
        }
    }

    fn challenge_for(
        signing_key: &SigningKey,
        method_id: &str,
        domain: &str,
    ) -> DidWbaChallenge {
        let mut challenge = DidWbaChallenge {
            did: "did:web:example.test".to_string(),
            nonce: "abc123".to_string(),
            timestamp: "2026-07-28T00:00:00Z".to_string(),
            verification_method: method_id.to_string(),
            signature: String::new(),
        };
        let payload = signing_payload(&challenge, domain);
        let signature = signing_key.sign(&payload);
        challenge.signature =
            base64::engine::general_purpose::STANDARD.encode(signature.to_bytes());
        challenge
    }

    #[test]
    fn valid_signature_verifies() {
        let key = signing_key();
        let method_id = "did:web:example.test#key-1";
        let document = document_for(&key, method_id);
        let challenge = challenge_for(&key, method_id, "gateway.example.test");
        verify_signature(&document, &challenge, "gateway.example.test").unwrap();
    }

    #[test]
    fn signature_bound_to_a_different_domain_fails() {
        let key = signing_key();
        let method_id = "did:web:example.test#key-1";
        let document = document_for(&key, method_id);
        let challenge = challenge_for(&key, method_id, "gateway.example.test");
        let err = verify_signature(&document, &challenge, "other.example.test").unwrap_err();
        assert!(matches!(err, Error::SignatureInvalid));
    }

    #[test]
    fn unknown_verification_method_is_rejected() {
        let key = signing_key();
        let document = document_for(&key, "did:web:example.test#key-1");
        let challenge = challenge_for(&key, "did:web:example.test#key-missing", "domain");
        let err = verify_signature(&document, &challenge, "domain").unwrap_err();
        assert!(matches!(err, Error::UnknownVerificationMethod(_)));
    }

    #[test]
    fn unsupported_key_type_is_rejected() {
        let key = signing_key();
        let method_id = "did:web:example.test#key-1";
        let mut document = document_for(&key, method_id);
        document.verification_methods[0].key_type = "JsonWebKey2020".to_string();
        let challenge = challenge_for(&key, method_id, "domain");
        let err = verify_signature(&document, &challenge, "domain").unwrap_err();
        assert!(matches!(err, Error::UnsupportedVerificationMethod(_)));
    }
}
