//! Submit interception.
//!
//! The checker sits in front of the host's own submit handlers. While the
//! hook is `Installed` a submit runs validation; during replay of the
//! host's handlers the hook is `Suppressed`, so a submit triggered from
//! inside a handler passes straight through instead of validating again.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// Host submit behaviour captured at attach time
pub type SubmitHandler = Box<dyn FnMut()>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookState {
    Installed,
    Suppressed,
}

/// Two-state controller around the checker's own submit hook
pub struct SubmitHook {
    state: Rc<Cell<HookState>>,
    handlers: Vec<SubmitHandler>,
}

impl fmt::Debug for SubmitHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubmitHook")
            .field("state", &self.state.get())
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

impl Default for SubmitHook {
    fn default() -> Self {
        Self::new()
    }
}

impl SubmitHook {
    pub fn new() -> Self {
        Self {
            state: Rc::new(Cell::new(HookState::Installed)),
            handlers: Vec::new(),
        }
    }

    pub fn state(&self) -> HookState {
        self.state.get()
    }

    pub fn is_suppressed(&self) -> bool {
        self.state() == HookState::Suppressed
    }

    /// Read-only view of the hook state that host code can keep
    pub fn handle(&self) -> HookHandle {
        HookHandle {
            state: Rc::clone(&self.state),
        }
    }

    /// Take over the host's submit handlers
    pub fn capture(&mut self, handlers: Vec<SubmitHandler>) {
        self.handlers.extend(handlers);
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Suppress the hook until the guard is dropped
    pub fn suppress(&self) -> SuppressGuard {
        let previous = self.state.replace(HookState::Suppressed);
        SuppressGuard {
            state: Rc::clone(&self.state),
            previous,
        }
    }

    /// Run every captured handler once, in capture order, with the hook suppressed
    pub fn replay(&mut self) -> usize {
        let _guard = self.suppress();
        for handler in self.handlers.iter_mut() {
            handler();
        }
        self.handlers.len()
    }
}

/// Restores the previous hook state on drop
#[must_use = "the hook is restored as soon as the guard is dropped"]
pub struct SuppressGuard {
    state: Rc<Cell<HookState>>,
    previous: HookState,
}

impl Drop for SuppressGuard {
    fn drop(&mut self) {
        self.state.set(self.previous);
    }
}

/// Shared read access to a hook's state
#[derive(Debug, Clone)]
pub struct HookHandle {
    state: Rc<Cell<HookState>>,
}

impl HookHandle {
    pub fn state(&self) -> HookState {
        self.state.get()
    }

    pub fn is_suppressed(&self) -> bool {
        self.state() == HookState::Suppressed
    }
}
