use crate::Error;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// A bounded, sliding-window one-shot nonce cache: global and
/// write-heavy, so it must stay bounded and sweep expired entries
/// rather than grow without limit.
///
/// A nonce is accepted the first time it is presented and rejected on
/// every subsequent presentation until it expires — i.e. a second
/// presentation within the window fails as a replay. See DESIGN.md.
pub struct NonceCache {
    entries: Mutex<HashMap<String, Instant>>,
    window: Duration,
    grace: Duration,
    max_entries: usize,
}

impl NonceCache {
    pub fn new(window: Duration, max_entries: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            window,
            grace: Duration::from_secs(5),
            max_entries,
        }
    }

    /// Marks `nonce` used if it has not been seen within the window,
    /// returning an error if it has (a replay).
    pub fn check_and_use(&self, nonce: &str) -> Result<(), Error> {
        let now = Instant::now();
        let mut entries = self.entries.lock().unwrap();
        if let Some(expiry) = entries.get(nonce) {
            if *expiry > now {
                return Err(Error::NonceReused);
            }
        }
        if entries.len() >= self.max_entries {
            Self::sweep_locked(&mut entries, now);
        }
        entries.insert(nonce.to_string(), now + self.window + self.grace);
        Ok(())
    }

    /// Removes every expired entry. Call periodically from the
    /// gateway's sweeper.
    pub fn sweep(&self) {
        let now = Instant::now();
        let mut entries = self.entries.lock().unwrap();
        Self::sweep_locked(&mut entries, now);
    }

    fn sweep_locked(entries: &mut HashMap<String, Instant>, now: Instant) {
        entries.retain(|_, expiry| *expiry > now);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_presentation_within_window_fails() {
        let cache = NonceCache::new(Duration::from_secs(300), 1024);
        cache.check_and_use("n1").unwrap();
        let err = cache.check_and_use("n1").unwrap_err();
        assert!(matches!(err, Error::NonceReused));
    }

    #[test]
    fn distinct_nonces_do_not_interfere() {
        let cache = NonceCache::new(Duration::from_secs(300), 1024);
        cache.check_and_use("n1").unwrap();
        cache.check_and_use("n2").unwrap();
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn sweep_drops_expired_entries() {
        let cache = NonceCache::new(Duration::from_millis(1), 1024);
        cache.check_and_use("n1").unwrap();
        std::thread::sleep(Duration::from_millis(10));
        cache.sweep();
        assert!(cache.is_empty());
        // and it can be reused once expired
        cache.check_and_use("n1").unwrap();
    }
}
