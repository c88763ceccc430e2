use crate::connection::TunnelConnection;
use crate::directory::canonicalize;
use crate::registry::TunnelRegistry;
use crate::Error;
use std::sync::Arc;
use uuid::Uuid;

/// Resolves an inbound request's host/path to a tunnel and reserves a
/// pending-request slot on it in one step.
///
/// Selection is least-pending-requests among healthy matching tunnels,
/// ties broken by oldest connection first. The final reservation uses
/// [`TunnelConnection::try_reserve`], which is atomic per-connection,
/// so a tunnel observed at capacity `k` during sort can never be
/// pushed past `max_pending` even under concurrent selection.
pub fn select_and_reserve(
    registry: &TunnelRegistry,
    host: &str,
    path: &str,
    request_id: Uuid,
) -> Result<Arc<TunnelConnection>, Error> {
    let canonical = canonicalize(host, path);
    let mut candidates = registry.healthy_tunnels_for(&canonical);
    if candidates.is_empty() {
        return Err(Error::NoRoute);
    }

    candidates.sort_by(|a, b| {
        a.pending_count()
            .cmp(&b.pending_count())
            .then_with(|| a.created_at.cmp(&b.created_at))
    });

    for candidate in candidates {
        if candidate.try_reserve(request_id) {
            return Ok(candidate);
        }
    }

    Err(Error::NoCapacity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::{TunnelState};
    use std::time::Duration;

    fn admit(registry: &TunnelRegistry, service_url: &str, max_pending: usize) -> Arc<TunnelConnection> {
        let conn = Arc::new(TunnelConnection::new(
            Uuid::new_v4(),
            "did:web:example.test".to_string(),
            vec![service_url.to_string()],
            max_pending,
        ));
        conn.set_state(TunnelState::Healthy);
        registry.admit(conn.clone());
        conn
    }

    #[test]
    fn routes_to_the_matching_tunnel() {
        let registry = TunnelRegistry::new(10, Duration::from_secs(120));
        let a = admit(&registry, "api.example.test/a", 100);
        let _b = admit(&registry, "api.example.test/b", 100);

        let selected = select_and_reserve(&registry, "api.example.test", "/a", Uuid::new_v4()).unwrap();
        assert_eq!(selected.id, a.id);

        let err = select_and_reserve(&registry, "api.example.test", "/c", Uuid::new_v4()).unwrap_err();
        assert_eq!(err, Error::NoRoute);
    }

    #[test]
    fn least_pending_wins_ties_broken_by_age() {
        let registry = TunnelRegistry::new(10, Duration::from_secs(120));
        let older = admit(&registry, "api.example.test", 100);
        std::thread::sleep(Duration::from_millis(5));
        let younger = admit(&registry, "api.example.test", 100);

        older.try_reserve(Uuid::new_v4());
        let selected = select_and_reserve(&registry, "api.example.test", "/", Uuid::new_v4()).unwrap();
        assert_eq!(selected.id, younger.id);

        // With equal pending counts, the older connection wins.
        younger.try_reserve(Uuid::new_v4());
        let selected = select_and_reserve(&registry, "api.example.test", "/", Uuid::new_v4()).unwrap();
        assert_eq!(selected.id, older.id);
    }

    #[test]
    fn no_capacity_when_every_candidate_is_full() {
        let registry = TunnelRegistry::new(10, Duration::from_secs(120));
        let conn = admit(&registry, "api.example.test", 1);
        conn.try_reserve(Uuid::new_v4());
        let err = select_and_reserve(&registry, "api.example.test", "/", Uuid::new_v4()).unwrap_err();
        assert_eq!(err, Error::NoCapacity);
    }
}
