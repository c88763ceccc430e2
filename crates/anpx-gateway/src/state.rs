use std::sync::Arc;
use std::time::Duration;

use anpx_did::{DidResolver, JwtIssuer, NonceCache};
use anpx_registry::{ServiceDirectory, TunnelRegistry};

use crate::config::Config;
use crate::correlator::Correlator;
use crate::tunnel_io::TunnelWriters;

/// Every shared collaborator the ingress and tunnel-accept paths need,
/// assembled once at startup as an explicit singleton with its init
/// and teardown tied to the gateway's own lifecycle, not process-wide
/// statics.
pub struct GatewayState {
    pub config: Config,
    pub registry: Arc<TunnelRegistry>,
    pub writers: Arc<TunnelWriters>,
    pub correlator: Arc<Correlator>,
    pub nonce_cache: Arc<NonceCache>,
    pub did_resolver: Arc<dyn DidResolver>,
    pub service_directory: Arc<dyn ServiceDirectory>,
    pub jwt_issuer: Option<JwtIssuer>,
}

impl GatewayState {
    pub fn new(
        config: Config,
        did_resolver: Arc<dyn DidResolver>,
        service_directory: Arc<dyn ServiceDirectory>,
        jwt_issuer: Option<JwtIssuer>,
    ) -> Arc<Self> {
        let registry = Arc::new(TunnelRegistry::new(
            config.max_connections,
            Duration::from_secs(config.keepalive_timeout_secs),
        ));
        let nonce_cache = Arc::new(NonceCache::new(
            Duration::from_secs(config.nonce_window_secs),
            100_000,
        ));
        Arc::new(Self {
            config,
            registry,
            writers: Arc::new(TunnelWriters::new()),
            correlator: Arc::new(Correlator::new()),
            nonce_cache,
            did_resolver,
            service_directory,
            jwt_issuer,
        })
    }
}
