use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anpx_wire::RespMeta;
use tokio::sync::oneshot;
use uuid::Uuid;

use crate::error::Error;

/// The terminal outcome of a pending HTTP request: exactly one of
/// these completes the slot.
#[derive(Debug)]
pub enum Outcome {
    Response { meta: RespMeta, body: Vec<u8> },
    Failed(FailureKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Timeout,
    TunnelLost,
    NoRoute,
    NoCapacity,
    /// A chunked request/response body was never fully reassembled
    /// and its partial buffer was evicted by the idle-reassembly sweep.
    ReassemblyTimeout,
}

impl From<FailureKind> for Error {
    fn from(kind: FailureKind) -> Self {
        match kind {
            FailureKind::Timeout => Error::RequestTimeout,
            FailureKind::TunnelLost => Error::TunnelLost("tunnel closed".to_string()),
            FailureKind::NoRoute => Error::NoRoute,
            FailureKind::NoCapacity => Error::NoCapacity,
            FailureKind::ReassemblyTimeout => {
                Error::Internal("reassembly buffer evicted: chunked frame never completed".to_string())
            }
        }
    }
}

struct Slot {
    sender: Option<oneshot::Sender<Outcome>>,
    created_at: Instant,
    deadline: Instant,
}

/// The pending-request table: maps a fresh `request_id` to a
/// single-shot completion channel. `complete` and `fail` are
/// idempotent no-ops on an already-resolved or absent slot — a second
/// `complete` after the first is silently dropped.
#[derive(Default)]
pub struct Correlator {
    slots: Mutex<HashMap<Uuid, Slot>>,
}

impl Correlator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a pending slot with the given deadline, returning the
    /// receiving half of its completion channel. Returns an `Err` if
    /// `request_id` is already pending — not expected in practice
    /// since ids are freshly generated UUIDs.
    pub fn register(
        &self,
        request_id: Uuid,
        timeout: Duration,
    ) -> Result<oneshot::Receiver<Outcome>, Error> {
        let (tx, rx) = oneshot::channel();
        let now = Instant::now();
        let mut slots = self.slots.lock().unwrap();
        if slots.contains_key(&request_id) {
            return Err(Error::Internal(format!(
                "duplicate request_id {request_id}"
            )));
        }
        slots.insert(
            request_id,
            Slot {
                sender: Some(tx),
                created_at: now,
                deadline: now + timeout,
            },
        );
        Ok(rx)
    }

    /// Completes a pending slot with a response. A no-op if the slot
    /// has already been completed or removed.
    pub fn complete(&self, request_id: Uuid, meta: RespMeta, body: Vec<u8>) {
        self.finish(request_id, Outcome::Response { meta, body });
    }

    /// Fails a pending slot. A no-op if already resolved or absent.
    pub fn fail(&self, request_id: Uuid, kind: FailureKind) {
        self.finish(request_id, Outcome::Failed(kind));
    }

    fn finish(&self, request_id: Uuid, outcome: Outcome) {
        let sender = {
            let mut slots = self.slots.lock().unwrap();
            slots.remove(&request_id).and_then(|mut slot| slot.sender.take())
        };
        if let Some(sender) = sender {
            let _ = sender.send(outcome);
        }
    }

    /// Removes a slot without sending anything — used when an ingress
    /// task is cancelled before a response arrives. Cancellation
    /// removes the pending slot within a bounded delay without closing
    /// the tunnel.
    pub fn remove(&self, request_id: Uuid) {
        self.slots.lock().unwrap().remove(&request_id);
    }

    /// Every request_id currently past its deadline. The caller is
    /// expected to call [`Correlator::fail`] with
    /// [`FailureKind::Timeout`] for each.
    pub fn expired(&self, now: Instant) -> Vec<Uuid> {
        self.slots
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, slot)| slot.deadline <= now)
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.slots.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[cfg(test)]
    fn age_of(&self, request_id: Uuid) -> Option<Duration> {
        self.slots
            .lock()
            .unwrap()
            .get(&request_id)
            .map(|slot| slot.created_at.elapsed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn complete_delivers_the_response_to_the_waiter() {
        let correlator = Correlator::new();
        let request_id = Uuid::new_v4();
        let rx = correlator
            .register(request_id, Duration::from_secs(5))
            .unwrap();

        correlator.complete(
            request_id,
            RespMeta {
                status: 200,
                reason: None,
                headers: Default::default(),
            },
            b"ok".to_vec(),
        );

        let outcome = rx.await.unwrap();
        assert!(matches!(outcome, Outcome::Response { .. }));
        assert!(correlator.is_empty());
    }

    #[tokio::test]
    async fn second_complete_after_first_is_a_no_op() {
        let correlator = Correlator::new();
        let request_id = Uuid::new_v4();
        let rx = correlator
            .register(request_id, Duration::from_secs(5))
            .unwrap();

        correlator.complete(
            request_id,
            RespMeta {
                status: 200,
                reason: None,
                headers: Default::default(),
            },
            Vec::new(),
        );
        // second completion: no receiver, no panic, no-op.
        correlator.complete(
            request_id,
            RespMeta {
                status: 500,
                reason: None,
                headers: Default::default(),
            },
            Vec::new(),
        );

        let outcome = rx.await.unwrap();
        match outcome {
            Outcome::Response { meta, .. } => assert_eq!(meta.status, 200),
            Outcome::Failed(_) => panic!("expected response"),
        }
    }

    #[tokio::test]
    async fn fail_after_timeout_race_is_a_no_op_for_the_loser() {
        let correlator = Correlator::new();
        let request_id = Uuid::new_v4();
        let rx = correlator
            .register(request_id, Duration::from_secs(5))
            .unwrap();

        correlator.fail(request_id, FailureKind::Timeout);
        correlator.complete(
            request_id,
            RespMeta {
                status: 200,
                reason: None,
                headers: Default::default(),
            },
            Vec::new(),
        );

        let outcome = rx.await.unwrap();
        assert!(matches!(outcome, Outcome::Failed(FailureKind::Timeout)));
    }

    #[tokio::test]
    async fn duplicate_request_id_registration_fails() {
        let correlator = Correlator::new();
        let request_id = Uuid::new_v4();
        let _rx = correlator
            .register(request_id, Duration::from_secs(5))
            .unwrap();
        assert!(correlator
            .register(request_id, Duration::from_secs(5))
            .is_err());
    }

    #[tokio::test]
    async fn expired_lists_only_slots_past_their_deadline() {
        let correlator = Correlator::new();
        let fast = Uuid::new_v4();
        let slow = Uuid::new_v4();
        let _rx1 = correlator.register(fast, Duration::from_millis(1)).unwrap();
        let _rx2 = correlator.register(slow, Duration::from_secs(60)).unwrap();

        tokio::time::sleep(Duration::from_millis(20)).await;

        let expired = correlator.expired(Instant::now());
        assert_eq!(expired, vec![fast]);
        assert!(correlator.age_of(fast).is_some());
    }

    #[tokio::test]
    async fn remove_drops_a_slot_without_completing_it() {
        let correlator = Correlator::new();
        let request_id = Uuid::new_v4();
        let rx = correlator
            .register(request_id, Duration::from_secs(5))
            .unwrap();
        correlator.remove(request_id);
        assert!(correlator.is_empty());
        assert!(rx.await.is_err());
    }
}
