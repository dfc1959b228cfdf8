//! Scoped ambient bindings for the render tree
//!
//! A binding is pushed for the duration of a closure and popped by a guard
//! when the closure returns or unwinds. Reads see the innermost binding on
//! the current thread, so sibling subtrees never observe each other.

use std::cell::RefCell;
use std::fmt;
use std::thread::LocalKey;

/// Stack of active bindings for one kind of context
pub struct ScopeStack<T> {
    entries: RefCell<Vec<T>>,
}

impl<T> ScopeStack<T> {
    pub fn new() -> Self {
        Self {
            entries: RefCell::new(Vec::new()),
        }
    }

    /// Number of nested scopes currently active
    #[cfg(test)]
    pub(crate) fn depth(&self) -> usize {
        self.entries.borrow().len()
    }
}

impl<T> Default for ScopeStack<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Pops the binding pushed by `provide` when dropped
struct ScopeGuard<T: 'static> {
    key: &'static LocalKey<ScopeStack<T>>,
}

impl<T: 'static> Drop for ScopeGuard<T> {
    fn drop(&mut self) {
        // try_with: the thread-local may already be gone during thread teardown
        let _ = self.key.try_with(|stack| stack.entries.borrow_mut().pop());
    }
}

/// Run `f` with `value` bound as the innermost scope of `key`
pub fn provide<T: 'static, R>(
    key: &'static LocalKey<ScopeStack<T>>,
    value: T,
    f: impl FnOnce() -> R,
) -> R {
    key.with(|stack| stack.entries.borrow_mut().push(value));
    let _guard = ScopeGuard { key };
    f()
}

/// Innermost binding of `key`, if any scope is active
pub fn current<T: Clone + 'static>(key: &'static LocalKey<ScopeStack<T>>) -> Option<T> {
    key.with(|stack| stack.entries.borrow().last().cloned())
}

/// A context accessor ran outside of its provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeError {
    /// Accessor that was called
    pub accessor: &'static str,
    /// Provider that should have been active
    pub provider: &'static str,
}

impl ScopeError {
    pub const fn new(accessor: &'static str, provider: &'static str) -> Self {
        Self { accessor, provider }
    }
}

impl fmt::Display for ScopeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} must be used within a {}", self.accessor, self.provider)
    }
}

impl std::error::Error for ScopeError {}

#[cfg(test)]
mod tests {
    use super::*;

    thread_local! {
        static NUMBERS: ScopeStack<u32> = ScopeStack::new();
    }

    #[test]
    fn nothing_bound_outside_provide() {
        assert_eq!(current(&NUMBERS), None);
    }

    #[test]
    fn innermost_binding_wins_and_unwinds() {
        provide(&NUMBERS, 1, || {
            assert_eq!(current(&NUMBERS), Some(1));
            provide(&NUMBERS, 2, || {
                assert_eq!(current(&NUMBERS), Some(2));
            });
            assert_eq!(current(&NUMBERS), Some(1));
        });
        assert_eq!(current(&NUMBERS), None);
    }

    #[test]
    fn guard_pops_on_panic() {
        let result = std::panic::catch_unwind(|| {
            provide(&NUMBERS, 7, || panic!("render blew up"));
        });
        assert!(result.is_err());
        assert_eq!(NUMBERS.with(|stack| stack.depth()), 0);
    }

    #[test]
    fn bindings_are_per_thread() {
        provide(&NUMBERS, 3, || {
            let seen = std::thread::spawn(|| current(&NUMBERS)).join().unwrap();
            assert_eq!(seen, None);
        });
    }

    #[test]
    fn error_names_the_provider() {
        let err = ScopeError::new("use_thing", "ThingProvider");
        assert_eq!(err.to_string(), "use_thing must be used within a ThingProvider");
    }
}
