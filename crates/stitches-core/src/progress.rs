use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Sink for placement progress.
///
/// `report` receives `placed / total` after every attempted sprite. Sinks are
/// best-effort observers: nothing they do changes where sprites land.
/// `is_cancelled` is polled between sprites; once it returns true the
/// remaining sprites are reported as cancelled.
pub trait Progress {
    fn report(&mut self, fraction: f32);
    fn is_cancelled(&self) -> bool {
        false
    }
}

impl Progress for () {
    fn report(&mut self, _fraction: f32) {}
}

impl<F: FnMut(f32)> Progress for F {
    fn report(&mut self, fraction: f32) {
        self(fraction)
    }
}

/// Shared cancellation flag; clones observe the same state.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Wraps a sink so a run can be stopped between sprites.
pub struct Cancellable<P> {
    inner: P,
    flag: CancelFlag,
}

impl<P: Progress> Cancellable<P> {
    pub fn new(inner: P, flag: CancelFlag) -> Self {
        Self { inner, flag }
    }

    pub fn into_inner(self) -> P {
        self.inner
    }
}

impl<P: Progress> Progress for Cancellable<P> {
    fn report(&mut self, fraction: f32) {
        self.inner.report(fraction)
    }

    fn is_cancelled(&self) -> bool {
        self.flag.is_cancelled() || self.inner.is_cancelled()
    }
}
