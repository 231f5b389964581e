use std::sync::atomic::{AtomicBool, Ordering};

/// A boolean that is raised for the lifetime of a [`FlagGuard`].
///
/// Used for reentrancy control: code that must not recurse into itself checks
/// the flag on entry and holds a guard while it runs. The guard restores the
/// previous value on drop, so the flag is lowered even if the guarded code panics.
#[derive(Debug, Default)]
pub struct ScopeFlag {
    raised: AtomicBool,
}

#[derive(Debug)]
#[must_use = "the flag is lowered as soon as the guard is dropped"]
pub struct FlagGuard<'a> {
    flag: &'a ScopeFlag,
    previous: bool,
}

impl ScopeFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::Acquire)
    }

    /// Raises the flag if it is lowered. Returns `None` when it is already raised.
    pub fn try_raise(&self) -> Option<FlagGuard<'_>> {
        self.raised
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| FlagGuard {
                flag: self,
                previous: false,
            })
    }

    /// Raises the flag unconditionally. Nested holds restore the outer state on drop.
    pub fn hold(&self) -> FlagGuard<'_> {
        let previous = self.raised.swap(true, Ordering::AcqRel);
        FlagGuard {
            flag: self,
            previous,
        }
    }
}

impl Drop for FlagGuard<'_> {
    fn drop(&mut self) {
        self.flag.raised.store(self.previous, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::ScopeFlag;

    #[test]
    fn try_raise_refuses_while_raised() {
        let flag = ScopeFlag::new();
        {
            let _guard = flag.try_raise().expect("flag starts lowered");
            assert!(flag.is_raised());
            assert!(flag.try_raise().is_none());
        }

        assert!(
            !flag.is_raised(),
            "FlagGuard should lower the flag on scope exit"
        );
        assert!(flag.try_raise().is_some());
    }

    #[test]
    fn nested_hold_restores_outer_state() {
        let flag = ScopeFlag::new();
        let outer = flag.hold();
        {
            let _inner = flag.hold();
            assert!(flag.is_raised());
        }
        assert!(flag.is_raised(), "inner hold must not lower the outer one");

        drop(outer);
        assert!(!flag.is_raised());
    }

    #[test]
    fn flag_lowered_after_panic() {
        let flag = ScopeFlag::new();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = flag.try_raise();
            panic!("propagation failed");
        }));

        assert!(result.is_err());
        assert!(!flag.is_raised());
    }
}
