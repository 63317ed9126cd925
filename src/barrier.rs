use std::sync::{Condvar, Mutex};

/// Rendezvous that guarantees no worker begins calling `pop` before all `N`
/// workers have been created (`spec.md` §4.4).
///
/// Main calls [`Self::register_and_wait`] once per worker it spawns
/// (serializing creation: it does not spawn worker `i+1` until worker `i`
/// has parked here), then calls [`Self::release_all`] exactly once after
/// the last worker has parked.
pub struct StartupBarrier {
    state: Mutex<State>,
    created: Condvar,
    go: Condvar,
}

struct State {
    parked: usize,
    released: bool,
}

impl StartupBarrier {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State { parked: 0, released: false }),
            created: Condvar::new(),
            go: Condvar::new(),
        }
    }

    /// Called by a freshly spawned worker: park here and signal the driver
    /// that this worker exists, then wait to be released alongside every
    /// other worker.
    pub fn register_and_wait(&self) {
        let mut state = self.state.lock().unwrap();
        state.parked += 1;
        self.created.notify_one();
        while !state.released {
            state = self.go.wait(state).unwrap();
        }
    }

    /// Called by the driver after spawning a worker: block until that
    /// worker (or a later one, though the driver only spawns one at a time)
    /// has parked.
    pub fn wait_for_one_arrival(&self, already_parked: usize) {
        let mut state = self.state.lock().unwrap();
        while state.parked <= already_parked {
            state = self.created.wait(state).unwrap();
        }
    }

    /// Release every parked worker simultaneously. Called exactly once,
    /// after the Nth worker has parked.
    pub fn release_all(&self) {
        let mut state = self.state.lock().unwrap();
        state.released = true;
        self.go.notify_all();
    }
}

impl Default for StartupBarrier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn no_worker_observes_go_before_all_are_parked() {
        let barrier = Arc::new(StartupBarrier::new());
        let started_count = Arc::new(AtomicUsize::new(0));
        let observed_early = Arc::new(AtomicUsize::new(0));
        const N: usize = 6;

        let mut handles = Vec::new();
        for _ in 0..N {
            let barrier = Arc::clone(&barrier);
            let started_count = Arc::clone(&started_count);
            let observed_early = Arc::clone(&observed_early);
            handles.push(thread::spawn(move || {
                barrier.register_and_wait();
                // if this worker ran before every worker had parked, the
                // count of already-started workers observed here would be
                // less than N at the moment it's released -- released only
                // flips after the driver has seen all N arrivals, so every
                // worker sees started_count == N once it proceeds.
                if started_count.fetch_add(1, Ordering::SeqCst) + 1 < N {
                    observed_early.fetch_add(1, Ordering::SeqCst);
                }
            }));
            barrier.wait_for_one_arrival(handles.len() - 1);
        }

        barrier.release_all();

        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(observed_early.load(Ordering::SeqCst), 0);
    }
}
