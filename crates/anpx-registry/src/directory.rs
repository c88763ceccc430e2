use crate::connection::ConnectionId;
use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

/// Canonicalizes a `(host, path)` pair into the directory key used
/// throughout routing: `lower(host) + normalized_path`, where
/// `normalized_path` preserves its leading slash and trims any
/// trailing slash except for the root path.
pub fn canonicalize(host: &str, path: &str) -> String {
    let mut out = host.to_lowercase();
    out.push_str(&normalize_path(path));
    out
}

/// Normalizes a path: keeps the leading `/`, trims a trailing `/`
/// unless the path is exactly `/`, and treats an empty path as host-only
/// (no path segment at all).
pub fn normalize_path(path: &str) -> String {
    if path.is_empty() {
        return String::new();
    }
    let mut path = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    };
    if path.len() > 1 && path.ends_with('/') {
        path.pop();
    }
    path
}

/// Splits a canonical service URL into its `(host, path)` halves. A
/// service URL with no path component (e.g. `"api.example.test"`) is a
/// host-only directory entry.
fn split_host_path(canonical: &str) -> (&str, &str) {
    match canonical.find('/') {
        Some(idx) => (&canonical[..idx], &canonical[idx..]),
        None => (canonical, ""),
    }
}

/// The in-process routing table. Holds, per host, the set of path entries published
/// by admitted tunnels and the connection ids bound to each. Entries
/// are published at admission and removed when the owning connection
/// is evicted — their lifetime equals the connection's lifetime.
pub struct Directory {
    // host -> (path-or-empty-for-host-only -> connection ids)
    by_host: RwLock<HashMap<String, HashMap<String, HashSet<ConnectionId>>>>,
    // connection id -> the canonical service URLs it published, for cleanup.
    by_connection: RwLock<HashMap<ConnectionId, Vec<String>>>,
}

impl Default for Directory {
    fn default() -> Self {
        Self::new()
    }
}

impl Directory {
    pub fn new() -> Self {
        Self {
            by_host: RwLock::new(HashMap::new()),
            by_connection: RwLock::new(HashMap::new()),
        }
    }

    /// Publishes a connection's declared (already-canonical) service
    /// URLs into the directory. Called once, at admission.
    pub fn publish(&self, connection_id: ConnectionId, service_urls: Vec<String>) {
        let mut by_host = self.by_host.write().unwrap();
        for url in &service_urls {
            let (host, path) = split_host_path(url);
            by_host
                .entry(host.to_string())
                .or_default()
                .entry(path.to_string())
                .or_default()
                .insert(connection_id);
        }
        self.by_connection
            .write()
            .unwrap()
            .insert(connection_id, service_urls);
    }

    /// Removes every entry published by `connection_id`. Called once,
    /// when the owning connection is evicted.
    pub fn unpublish(&self, connection_id: &ConnectionId) {
        let urls = self.by_connection.write().unwrap().remove(connection_id);
        let Some(urls) = urls else { return };
        let mut by_host = self.by_host.write().unwrap();
        for url in &urls {
            let (host, path) = split_host_path(url);
            if let Some(paths) = by_host.get_mut(host) {
                if let Some(set) = paths.get_mut(path) {
                    set.remove(connection_id);
                    if set.is_empty() {
                        paths.remove(path);
                    }
                }
                if paths.is_empty() {
                    by_host.remove(host);
                }
            }
        }
    }

    /// Resolves a canonical `host + path` request key to the set of
    /// connection ids bound to it, following a three-stage resolution
    /// order: exact match, then longest-prefix match on a `/`-bounded
    /// path segment, then host-only match.
    pub fn lookup(&self, canonical: &str) -> Vec<ConnectionId> {
        let (host, path) = split_host_path(canonical);
        let by_host = self.by_host.read().unwrap();
        let Some(paths) = by_host.get(host) else {
            return Vec::new();
        };

        // 1. exact match on the full canonical service URL.
        if let Some(set) = paths.get(path) {
            if !set.is_empty() {
                return set.iter().copied().collect();
            }
        }

        // 2. longest-prefix match on host + path_prefix entries. The
        // candidate must end at a `/` boundary in `path` — "/a" matches
        // "/a/b" but not "/ab" or "/a-other".
        let mut best: Option<(&str, &HashSet<ConnectionId>)> = None;
        for (candidate_path, set) in paths.iter() {
            if candidate_path.is_empty() || set.is_empty() {
                continue;
            }
            let boundary_ok = candidate_path == "/"
                || path.as_bytes().get(candidate_path.len()) == Some(&b'/');
            if path.len() > candidate_path.len()
                && path.starts_with(candidate_path.as_str())
                && boundary_ok
            {
                let is_longer = best
                    .map(|(best_path, _)| candidate_path.len() > best_path.len())
                    .unwrap_or(true);
                if is_longer {
                    best = Some((candidate_path, set));
                }
            }
        }
        if let Some((_, set)) = best {
            return set.iter().copied().collect();
        }

        // 3. host-only match.
        if let Some(set) = paths.get("") {
            if !set.is_empty() {
                return set.iter().copied().collect();
            }
        }

        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonicalize_trims_trailing_slash_but_keeps_root() {
        assert_eq!(canonicalize("API.Example.test", "/a/"), "api.example.test/a");
        assert_eq!(canonicalize("api.example.test", "/"), "api.example.test/");
        assert_eq!(canonicalize("api.example.test", ""), "api.example.test");
    }

    #[test]
    fn exact_then_prefix_then_host_only() {
        let dir = Directory::new();
        let host_only = ConnectionId::new_v4();
        let prefix = ConnectionId::new_v4();
        let exact = ConnectionId::new_v4();
        dir.publish(host_only, vec!["api.example.test".to_string()]);
        dir.publish(prefix, vec!["api.example.test/a".to_string()]);
        dir.publish(exact, vec!["api.example.test/a/b".to_string()]);

        assert_eq!(dir.lookup("api.example.test/a/b"), vec![exact]);
        assert_eq!(dir.lookup("api.example.test/a/c"), vec![prefix]);
        assert_eq!(dir.lookup("api.example.test/z"), vec![host_only]);
        assert!(dir.lookup("other.example.test").is_empty());
    }

    #[test]
    fn prefix_match_requires_a_path_segment_boundary() {
        let dir = Directory::new();
        let prefix = ConnectionId::new_v4();
        dir.publish(prefix, vec!["api.example.test/a".to_string()]);

        assert_eq!(dir.lookup("api.example.test/a/b"), vec![prefix]);
        assert!(dir.lookup("api.example.test/ab").is_empty());
        assert!(dir.lookup("api.example.test/a-other").is_empty());
    }

    #[test]
    fn unpublish_removes_all_entries_for_connection() {
        let dir = Directory::new();
        let id = ConnectionId::new_v4();
        dir.publish(id, vec!["api.example.test/a".to_string()]);
        assert_eq!(dir.lookup("api.example.test/a"), vec![id]);
        dir.unpublish(&id);
        assert!(dir.lookup("api.example.test/a").is_empty());
    }
}
