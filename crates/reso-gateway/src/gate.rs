//! Execution gate: lifecycle state plus in-flight accounting
//!
//! The gate is the only synchronization device between callers executing
//! work against the native engine and `destroy()` tearing it down: an
//! atomic lifecycle state, an atomic in-flight counter, and a condvar the
//! destroyer parks on until the counter drains to zero. Work is never
//! interrupted; the destroyer waits.

use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};

use parking_lot::{Condvar, Mutex};

/// Lifecycle states of a gateway instance. `Destroyed` is terminal; there
/// is no path back to `Active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum LifecycleState {
    Active = 0,
    Destroying = 1,
    Destroyed = 2,
}

impl LifecycleState {
    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Self::Active,
            1 => Self::Destroying,
            _ => Self::Destroyed,
        }
    }
}

pub(crate) struct ExecutionGate {
    state: AtomicU8,
    in_flight: AtomicUsize,
    drain_lock: Mutex<()>,
    drained: Condvar,
}

impl ExecutionGate {
    pub(crate) fn new() -> Self {
        Self {
            state: AtomicU8::new(LifecycleState::Active as u8),
            in_flight: AtomicUsize::new(0),
            drain_lock: Mutex::new(()),
            drained: Condvar::new(),
        }
    }

    pub(crate) fn state(&self) -> LifecycleState {
        LifecycleState::from_u8(self.state.load(Ordering::SeqCst))
    }

    /// Begin an execution. The fast-path rejection leaves the counter
    /// untouched; the post-increment re-check closes the window against a
    /// concurrent `begin_destroy`.
    pub(crate) fn enter(&self) -> Result<ExecutionTicket<'_>, ()> {
        if self.state() != LifecycleState::Active {
            return Err(());
        }
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        if self.state() != LifecycleState::Active {
            self.leave();
            return Err(());
        }
        Ok(ExecutionTicket { gate: self })
    }

    fn leave(&self) {
        if self.in_flight.fetch_sub(1, Ordering::SeqCst) == 1 {
            // Take the lock before notifying so a drainer cannot check the
            // counter and park between our decrement and the wakeup.
            let _held = self.drain_lock.lock();
            self.drained.notify_all();
        }
    }

    pub(crate) fn executing_count(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Move Active -> Destroying. False if another destroyer already won.
    pub(crate) fn begin_destroy(&self) -> bool {
        self.state
            .compare_exchange(
                LifecycleState::Active as u8,
                LifecycleState::Destroying as u8,
                Ordering::SeqCst,
                Ordering::SeqCst,
            )
            .is_ok()
    }

    /// Block until every in-flight execution has finished.
    pub(crate) fn drain(&self) {
        let mut held = self.drain_lock.lock();
        while self.in_flight.load(Ordering::SeqCst) != 0 {
            self.drained.wait(&mut held);
        }
    }

    /// Mark the terminal state. Only the destroyer that won
    /// `begin_destroy` calls this.
    pub(crate) fn finish_destroy(&self) {
        self.state
            .store(LifecycleState::Destroyed as u8, Ordering::SeqCst);
    }
}

/// Scoped in-flight registration: decrements on every exit path.
pub(crate) struct ExecutionTicket<'a> {
    gate: &'a ExecutionGate,
}

impl Drop for ExecutionTicket<'_> {
    fn drop(&mut self) {
        self.gate.leave();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    use super::*;

    #[test]
    fn tickets_balance_the_counter() {
        let gate = ExecutionGate::new();
        assert_eq!(gate.executing_count(), 0);

        let first = gate.enter().unwrap();
        let second = gate.enter().unwrap();
        assert_eq!(gate.executing_count(), 2);

        drop(first);
        assert_eq!(gate.executing_count(), 1);
        drop(second);
        assert_eq!(gate.executing_count(), 0);
    }

    #[test]
    fn enter_fails_once_destroy_begins() {
        let gate = ExecutionGate::new();
        assert!(gate.begin_destroy());
        assert!(gate.enter().is_err());
        assert_eq!(gate.executing_count(), 0);
        assert_eq!(gate.state(), LifecycleState::Destroying);
    }

    #[test]
    fn only_one_destroyer_wins() {
        let gate = ExecutionGate::new();
        assert!(gate.begin_destroy());
        assert!(!gate.begin_destroy());
        gate.finish_destroy();
        assert!(!gate.begin_destroy());
        assert_eq!(gate.state(), LifecycleState::Destroyed);
    }

    #[test]
    fn drain_waits_for_in_flight_work() {
        let gate = Arc::new(ExecutionGate::new());
        let (release_tx, release_rx) = mpsc::channel::<()>();

        let worker = {
            let gate = gate.clone();
            thread::spawn(move || {
                let ticket = gate.enter().unwrap();
                release_rx.recv().unwrap();
                drop(ticket);
            })
        };

        while gate.executing_count() == 0 {
            thread::yield_now();
        }
        assert!(gate.begin_destroy());

        let drainer = {
            let gate = gate.clone();
            thread::spawn(move || gate.drain())
        };

        // The drainer must still be parked while the worker holds a ticket.
        thread::sleep(Duration::from_millis(50));
        assert!(!drainer.is_finished());

        release_tx.send(()).unwrap();
        worker.join().unwrap();
        drainer.join().unwrap();
        assert_eq!(gate.executing_count(), 0);
    }
}
