use async_trait::async_trait;
use crate::Error;

/// One verification method published in a DID document.
///
/// This repository supports `Ed25519VerificationKey2020` methods:
/// DID-WBA documents in practice publish Ed25519 or RSA/JWK methods,
/// and Ed25519 is the one this repository can verify unambiguously
/// without guessing at a JWK curve. Any other `key_type` is rejected
/// with
/// [`Error::UnsupportedVerificationMethod`] rather than silently
/// mis-verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationMethod {
    pub id: String,
    pub key_type: String,
    /// Standard base64 (not multibase) encoding of the raw public key
    /// bytes, for simplicity — production resolvers are expected to
    /// translate whatever encoding the document actually uses.
    pub public_key_base64: String,
}

/// A resolved DID document: just enough to verify a DID-WBA challenge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DidDocument {
    pub id: String,
    pub verification_methods: Vec<VerificationMethod>,
}

impl DidDocument {
    pub fn verification_method(&self, id: &str) -> Option<&VerificationMethod> {
        self.verification_methods.iter().find(|m| m.id == id)
    }
}

/// The abstract DID document resolver. Production deployments
/// implement this against whatever DID methods they support
/// (`did:web`, `did:key`, ...).
#[async_trait]
pub trait DidResolver: Send + Sync {
    async fn resolve(&self, did: &str) -> Result<DidDocument, Error>;
}

/// A fixed-table resolver for tests.
#[derive(Debug, Default, Clone)]
pub struct StaticDidResolver {
    documents: std::collections::HashMap<String, DidDocument>,
}

impl StaticDidResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, document: DidDocument) -> Self {
        self.documents.insert(document.id.clone(), document);
        self
    }
}

#[async_trait]
impl DidResolver for StaticDidResolver {
    async fn resolve(&self, did: &str) -> Result<DidDocument, Error> {
        self.documents
            .get(did)
            .cloned()
            .ok_or_else(|| Error::ResolutionFailed(format!("unknown DID {did}")))
    }
}
