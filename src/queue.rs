use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::{Condvar, Mutex};

/// State guarded by the queue's primary lock `Q`.
struct Inner {
    /// The FIFO itself. A manual linked list (as in the original C) is
    /// inessential; a `VecDeque` gives the same push-back/pop-front shape.
    entries: VecDeque<PathBuf>,
    /// Number of workers currently parked in `pop`'s wait loop.
    num_sleeping: usize,
    /// Next slot a would-be sleeper will claim.
    sleep_tail: usize,
    /// Next slot a push will target when waking a sleeper.
    sleep_head: usize,
    /// Set once quiescence has been detected; every subsequent `pop` call
    /// (including ones that arrive after the broadcast) must also return
    /// `None` instead of re-entering the wait loop.
    terminated: bool,
    /// Set by `push` while an in-progress hand-off is awaiting the
    /// consumer's confirmation, so the popping worker knows to signal `H`.
    handoff_pending: bool,
}

/// The concurrent FIFO path queue described in `spec.md` §4.1.
///
/// Guarantees, simultaneously:
/// 1. Mutual exclusion of all structural mutation under one lock.
/// 2. FIFO wake order: the longest-sleeping worker is woken first.
/// 3. Hand-off: a push that wakes a sleeper blocks until that sleeper has
///    taken the item, so a second pusher cannot race in and steal the slot.
/// 4. Quiescence detection: once every worker is asleep on an empty queue,
///    all of them are released with `pop` returning `None`.
pub struct PathQueue {
    /// Guards all structural mutation (`Q` in `spec.md`).
    inner: Mutex<Inner>,
    /// Push serializer (`P` in `spec.md`). Held across the hand-off wait so
    /// a second concurrent pusher cannot satisfy a later sleeper out of
    /// order. Lock order is always `push_serializer` before `inner`, never
    /// the reverse.
    push_serializer: Mutex<()>,
    /// One condvar per worker slot -- the wake ring.
    wake_ring: Vec<Condvar>,
    /// Signalled by a consumer once it has taken the item a push just
    /// handed off, releasing the paused pusher.
    handoff_done: Condvar,
}

impl PathQueue {
    /// Build a queue sized for exactly `thread_count` workers.
    #[must_use]
    pub fn new(thread_count: usize) -> Self {
        assert!(thread_count > 0, "a queue needs at least one worker slot");
        Self {
            inner: Mutex::new(Inner {
                entries: VecDeque::new(),
                num_sleeping: 0,
                sleep_tail: 0,
                sleep_head: 0,
                terminated: false,
                handoff_pending: false,
            }),
            push_serializer: Mutex::new(()),
            wake_ring: (0..thread_count).map(|_| Condvar::new()).collect(),
            handoff_done: Condvar::new(),
        }
    }

    /// Push a path, waking the longest-waiting sleeper if one exists and
    /// waiting for it to take the item (hand-off) before returning.
    pub fn push(&self, path: PathBuf) {
        // P before Q, never the reverse.
        let _push_guard = self.push_serializer.lock().unwrap();
        let mut state = self.inner.lock().unwrap();

        state.entries.push_back(path);

        if state.sleep_head != state.sleep_tail {
            let slot = state.sleep_head;
            state.sleep_head = (state.sleep_head + 1) % self.wake_ring.len();
            state.handoff_pending = true;
            self.wake_ring[slot].notify_one();

            // Wait for the woken consumer to confirm it has taken an item.
            while state.handoff_pending {
                state = self.handoff_done.wait(state).unwrap();
            }
        }
        // state (and both locks) drop here.
    }

    /// Pop the next path, or `None` once the queue has permanently
    /// terminated (every worker simultaneously idle on an empty queue).
    pub fn pop(&self) -> Option<PathBuf> {
        let mut state = self.inner.lock().unwrap();

        loop {
            if state.terminated {
                return None;
            }

            if let Some(path) = state.entries.pop_front() {
                if state.handoff_pending {
                    state.handoff_pending = false;
                    self.handoff_done.notify_one();
                }
                return Some(path);
            }

            let slot = state.sleep_tail;
            state.sleep_tail = (state.sleep_tail + 1) % self.wake_ring.len();
            state.num_sleeping += 1;

            if state.num_sleeping == self.wake_ring.len() {
                state.terminated = true;
                for cv in &self.wake_ring {
                    cv.notify_all();
                }
                return None;
            }

            // `Condvar::wait` atomically releases `inner` while parked and
            // reacquires it before returning, so a push observing
            // `sleep_tail` only ever does so after this increment has been
            // published, and a spurious wake simply re-enters the loop.
            state = self.wake_ring[slot].wait(state).unwrap();
            state.num_sleeping -= 1;
        }
    }
}
