use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicBool, Ordering};

use super::sink::{Action, OutputSink};

/// Holds an action's in-flight flag and busy state for the duration of one request.
///
/// Both are released on drop, so every exit path (including unwinding)
/// returns the control to idle.
pub(crate) struct BusyGuard<'a, S: OutputSink + ?Sized> {
    sink: &'a mut S,
    in_flight: &'a AtomicBool,
    action: Action,
}

impl<'a, S: OutputSink + ?Sized> BusyGuard<'a, S> {
    /// Claims the flag and marks the control busy.
    ///
    /// Returns `None` without touching the sink if the action is already in flight.
    pub(crate) fn acquire(in_flight: &'a AtomicBool, action: Action, sink: &'a mut S) -> Option<Self> {
        if in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return None;
        }

        sink.set_busy(action, true);
        Some(Self {
            sink,
            in_flight,
            action,
        })
    }
}

impl<S: OutputSink + ?Sized> Deref for BusyGuard<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        &*self.sink
    }
}

impl<S: OutputSink + ?Sized> DerefMut for BusyGuard<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        &mut *self.sink
    }
}

impl<S: OutputSink + ?Sized> Drop for BusyGuard<'_, S> {
    fn drop(&mut self) {
        self.sink.set_busy(self.action, false);
        self.in_flight.store(false, Ordering::Release);
    }
}
