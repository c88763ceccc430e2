use async_trait::async_trait;

/// The external, database-backed DID policy store: the core only
/// queries this abstract trait. This is a narrow collaborator
/// interface, not the in-process routing table — see
/// [`crate::directory::Directory`] for that.
///
/// Queried once per tunnel admission to resolve which service URLs a
/// DID is authorized to expose. An empty result denies admission.
#[async_trait]
pub trait ServiceDirectory: Send + Sync {
    /// Returns the canonical service URLs `did` is authorized to
    /// expose, or an empty `Vec` if the DID is unknown or has no
    /// authorized services.
    async fn authorized_service_urls(&self, did: &str) -> Vec<String>;
}

/// A fixed-table `ServiceDirectory` for tests and for wrapping a small
/// static deployment. Production deployments are expected to supply
/// their own implementation backed by whatever store holds DID
/// policy.
#[derive(Debug, Default, Clone)]
pub struct StaticServiceDirectory {
    entries: std::collections::HashMap<String, Vec<String>>,
}

impl StaticServiceDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, did: impl Into<String>, service_urls: Vec<String>) -> Self {
        self.entries.insert(did.into(), service_urls);
        self
    }
}

#[async_trait]
impl ServiceDirectory for StaticServiceDirectory {
    async fn authorized_service_urls(&self, did: &str) -> Vec<String> {
        self.entries.get(did).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unknown_did_has_no_authorized_services() {
        let directory = StaticServiceDirectory::new();
        assert!(directory.authorized_service_urls("did:web:nobody").await.is_empty());
    }

    #[tokio::test]
    async fn known_did_returns_its_entries() {
        let directory = StaticServiceDirectory::new()
            .with_entry("did:web:example.test", vec!["api.example.test/a".to_string()]);
        assert_eq!(
            directory.authorized_service_urls("did:web:example.test").await,
            vec!["api.example.test/a".to_string()]
        );
    }
}
