use std::collections::HashMap;
use std::sync::Arc;

use anpx_did::{DidDocument, DidResolver, StaticDidResolver, VerificationMethod};
use anpx_registry::{ServiceDirectory, StaticServiceDirectory};
use serde::Deserialize;

/// The small static admission table a single-deployment gateway loads
/// at startup. The database-backed DID policy store and the DID
/// document resolver are both external collaborators consumed through
/// narrow interfaces — [`anpx_did::DidResolver`] and
/// [`anpx_registry::ServiceDirectory`]. This file format is this
/// repository's simplest concrete
/// implementation of those interfaces, suitable for a single-operator
/// deployment; production deployments wire their own
/// database-backed/`did:web`-resolving implementations of the same
/// two traits instead of loading this file.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct DeploymentFile {
    #[serde(default)]
    pub dids: Vec<DidEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DidEntry {
    pub did: String,
    pub service_urls: Vec<String>,
    #[serde(default)]
    pub verification_methods: Vec<VerificationMethodEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VerificationMethodEntry {
    pub id: String,
    pub key_type: String,
    pub public_key_base64: String,
}

impl DeploymentFile {
    pub fn from_toml_str(input: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(input)
    }

    /// Builds the pair of trait objects [`crate::state::GatewayState`]
    /// is assembled from.
    pub fn build(&self) -> (Arc<dyn DidResolver>, Arc<dyn ServiceDirectory>) {
        let mut resolver = StaticDidResolver::new();
        let mut directory = StaticServiceDirectory::new();
        let mut by_did: HashMap<String, Vec<String>> = HashMap::new();

        for entry in &self.dids {
            by_did
                .entry(entry.did.clone())
                .or_default()
                .extend(entry.service_urls.iter().cloned());
            resolver = resolver.with_document(DidDocument {
                id: entry.did.clone(),
                verification_methods: entry
                    .verification_methods
                    .iter()
                    .map(|m| VerificationMethod {
                        id: m.id.clone(),
                        key_type: m.key_type.clone(),
                        public_key_base64: m.public_key_base64.clone(),
                    })
                    .collect(),
            });
        }
        for (did, service_urls) in by_did {
            directory = directory.with_entry(did, service_urls);
        }

        (Arc::new(resolver), Arc::new(directory))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_minimal_deployment_file() {
        let toml = r#"
            [[dids]]
            did = "did:web:example.test"
            service_urls = ["api.example.test"]

            [[dids.verification_methods]]
            id = "did:web:example.test#key-1"
            key_type = "Ed25519VerificationKey2020"
            public_key_base64 = "AAAA"
        "#;
        let file = DeploymentFile::from_toml_str(toml).unwrap();
        assert_eq!(file.dids.len(), 1);
        assert_eq!(file.dids[0].service_urls, vec!["api.example.test".to_string()]);
    }
}
