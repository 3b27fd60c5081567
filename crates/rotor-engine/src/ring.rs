//! Published kinematics: the current snapshot plus a short step history.
//!
//! [`SnapshotRing`] is seeded with the reset snapshot, so a reader always
//! gets a snapshot. Publication swaps one `Arc` under the `current` lock;
//! a reader clones that `Arc` and never sees fields from two steps.
//! History slots are indexed by `step % capacity` and each snapshot
//! carries its own [`StepId`], so a lookup can tell its target from a
//! newer step that reused the slot.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rotor_core::{KinematicsSnapshot, StepId};

type Shared = Arc<KinematicsSnapshot>;

/// Current snapshot and the last `capacity` steps.
///
/// Written only by the simulation thread; read from any thread.
pub struct SnapshotRing {
    current: Mutex<Shared>,
    history: Vec<Mutex<Option<Shared>>>,
}

// Compile-time assertion: SnapshotRing must be Send + Sync.
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<SnapshotRing>();
};

// Every guarded value is a whole `Arc`, so a poisoned lock still holds
// a consistent snapshot.
fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl SnapshotRing {
    /// History of `capacity` steps, starting from `initial`.
    ///
    /// # Panics
    ///
    /// Panics if `capacity < 2`. Worker configuration validation rejects
    /// such values before a ring is built.
    pub fn new(capacity: usize, initial: KinematicsSnapshot) -> Self {
        assert!(capacity >= 2, "SnapshotRing capacity must be >= 2, got {capacity}");
        let initial = Arc::new(initial);
        let history: Vec<_> = (0..capacity).map(|_| Mutex::new(None)).collect();
        *lock(&history[slot(initial.step, capacity)]) = Some(Arc::clone(&initial));
        Self {
            current: Mutex::new(initial),
            history,
        }
    }

    /// Make `snapshot` the current one and record it in the history.
    pub fn publish(&self, snapshot: KinematicsSnapshot) {
        let snapshot = Arc::new(snapshot);
        // History first: once a step is current it can also be looked up.
        *lock(&self.history[slot(snapshot.step, self.history.len())]) =
            Some(Arc::clone(&snapshot));
        *lock(&self.current) = snapshot;
    }

    /// The most recently published snapshot.
    pub fn latest(&self) -> Shared {
        Arc::clone(&lock(&self.current))
    }

    /// The snapshot of `step`, while it is still retained.
    pub fn at(&self, step: StepId) -> Option<Shared> {
        lock(&self.history[slot(step, self.history.len())])
            .as_ref()
            .filter(|s| s.step == step)
            .cloned()
    }
}

fn slot(step: StepId, capacity: usize) -> usize {
    (step.0 % capacity as u64) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use rotor_core::{GimbalState, Pose, VehicleState};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;

    fn snap(step: u64) -> KinematicsSnapshot {
        let mut state = VehicleState::at_rest(&Pose::default(), 4);
        state.position.x = step as f64;
        state.position.y = step as f64;
        state.position.z = step as f64;
        KinematicsSnapshot::capture(
            StepId(step),
            step as f64 * 0.01,
            &state,
            GimbalState::default(),
            1.0,
        )
    }

    #[test]
    fn seeded_with_initial_snapshot() {
        let ring = SnapshotRing::new(4, snap(0));
        assert_eq!(ring.latest().step, StepId(0));
        assert_eq!(ring.at(StepId(0)).unwrap().step, StepId(0));
        assert!(ring.at(StepId(1)).is_none());
    }

    #[test]
    fn latest_is_newest() {
        let ring = SnapshotRing::new(4, snap(0));
        for i in 1..10 {
            ring.publish(snap(i));
        }
        assert_eq!(ring.latest().step, StepId(9));
    }

    #[test]
    fn history_keeps_last_capacity_steps() {
        let ring = SnapshotRing::new(4, snap(0));
        for i in 1..8 {
            ring.publish(snap(i));
        }
        assert!(ring.at(StepId(0)).is_none());
        assert!(ring.at(StepId(3)).is_none());
        assert_eq!(ring.at(StepId(4)).unwrap().step, StepId(4));
        assert_eq!(ring.at(StepId(7)).unwrap().step, StepId(7));
        assert!(ring.at(StepId(8)).is_none());
    }

    #[test]
    #[should_panic(expected = "capacity must be >= 2")]
    fn capacity_below_two_panics() {
        SnapshotRing::new(1, snap(0));
    }

    // ── Cross-thread ─────────────────────────────────────────────

    #[test]
    fn readers_never_see_mixed_steps() {
        let ring = Arc::new(SnapshotRing::new(4, snap(0)));
        let done = Arc::new(AtomicBool::new(false));

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let ring = Arc::clone(&ring);
                let done = Arc::clone(&done);
                thread::spawn(move || {
                    let mut reads = 0u64;
                    let mut last = 0u64;
                    while !done.load(Ordering::Acquire) || reads == 0 {
                        let s = ring.latest();
                        let k = s.step.0 as f64;
                        assert_eq!(s.position.x, k);
                        assert_eq!(s.position.y, k);
                        assert_eq!(s.position.z, k);
                        assert!(s.step.0 >= last, "latest went backwards");
                        last = s.step.0;
                        reads += 1;
                        thread::yield_now();
                    }
                    reads
                })
            })
            .collect();

        for i in 1..5000 {
            ring.publish(snap(i));
        }
        done.store(true, Ordering::Release);
        for r in readers {
            assert!(r.join().unwrap() > 0);
        }
        assert_eq!(ring.latest().step, StepId(4999));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn retained_iff_within_capacity(capacity in 2usize..16, published in 0u64..64) {
                let ring = SnapshotRing::new(capacity, snap(0));
                for i in 1..=published {
                    ring.publish(snap(i));
                }
                prop_assert_eq!(ring.latest().step, StepId(published));
                for k in 0..=published + 2 {
                    let expected = k <= published && published - k < capacity as u64;
                    prop_assert_eq!(ring.at(StepId(k)).is_some(), expected, "step {}", k);
                }
            }
        }
    }
}
