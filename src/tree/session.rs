use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

/// State shared between the host and the tree layer for one signed-in session.
#[derive(Debug, Default)]
pub struct SessionContext {
    busy: AtomicBool,
    authenticated: AtomicBool,
    count_warned: AtomicBool,
    filter: Mutex<Option<String>>,
}

/// Held for the duration of one top-level render. Dropping it clears the busy flag.
#[derive(Debug)]
pub struct BusyGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` when another render already holds the flag.
    pub fn try_begin_render(&self) -> Option<BusyGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| BusyGuard { flag: &self.busy })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated.load(Ordering::Acquire)
    }

    pub fn set_authenticated(&self, value: bool) {
        self.authenticated.store(value, Ordering::Release);
    }

    pub fn filter(&self) -> Option<String> {
        self.filter.lock().ok().and_then(|f| f.clone())
    }

    /// Replace the display-name prefix filter. Blank clears it.
    pub fn set_filter(&self, prefix: Option<&str>) {
        let next = prefix
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string);
        if let Ok(mut f) = self.filter.lock() {
            *f = next;
        }
    }

    /// True exactly once per session.
    pub fn take_count_warning(&self) -> bool {
        !self.count_warned.swap(true, Ordering::AcqRel)
    }
}

#[cfg(test)]
#[path = "../tests/tree/session_tests.rs"]
mod tests;
