//! Uniform set/observe access to one piece of session state.

use std::sync::Arc;

use common::ScopeFlag;
use lineage::CellId;
use parking_lot::Mutex;

use crate::session::{CellListener, ListenerId};

/// Pushes a cell into session state and reports changes of that state.
pub trait SpotHook: Send + Sync {
    /// Pushes `cell` outward. `None` clears the state where that makes sense.
    fn set(&self, cell: Option<CellId>);

    /// Installs the receiver of change notifications.
    ///
    /// # Panics
    /// If a listener was already installed.
    fn set_listener(&self, listener: CellListener);

    /// Stops notifications. Idempotent.
    fn close(&self);
}

impl<T: SpotHook + ?Sized> SpotHook for Box<T> {
    fn set(&self, cell: Option<CellId>) {
        (**self).set(cell)
    }

    fn set_listener(&self, listener: CellListener) {
        (**self).set_listener(listener)
    }

    fn close(&self) {
        (**self).close()
    }
}

impl<T: SpotHook + ?Sized> SpotHook for Arc<T> {
    fn set(&self, cell: Option<CellId>) {
        (**self).set(cell)
    }

    fn set_listener(&self, listener: CellListener) {
        (**self).set_listener(listener)
    }

    fn close(&self) {
        (**self).close()
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
enum RegistrationState {
    #[default]
    Unset,
    Active(ListenerId),
    Closed,
}

/// Listener registration of an adapter with its native observable.
#[derive(Debug, Default)]
pub(crate) struct NativeRegistration {
    state: Mutex<RegistrationState>,
}

impl NativeRegistration {
    /// Registers through `register` unless the hook is closed.
    pub(crate) fn attach(&self, register: impl FnOnce() -> ListenerId) {
        let mut state = self.state.lock();
        match *state {
            RegistrationState::Unset => *state = RegistrationState::Active(register()),
            RegistrationState::Active(_) => panic!("Hook listener can only be set once"),
            RegistrationState::Closed => {}
        }
    }

    /// Returns the id to deregister, once.
    pub(crate) fn detach(&self) -> Option<ListenerId> {
        let mut state = self.state.lock();
        match std::mem::replace(&mut *state, RegistrationState::Closed) {
            RegistrationState::Active(id) => Some(id),
            RegistrationState::Unset | RegistrationState::Closed => None,
        }
    }

    pub(crate) fn is_closed(&self) -> bool {
        *self.state.lock() == RegistrationState::Closed
    }
}

/// Breaks feedback loops between two mirrored hooks.
///
/// `set` is dropped while the flag is raised. The flag is raised while
/// forwarding a `set` and while delivering a notification from the wrapped
/// hook, so a change travelling out of this hook cannot come back in.
#[derive(Debug)]
pub struct GuardingHook<H> {
    inner: H,
    flag: Arc<ScopeFlag>,
}

impl<H: SpotHook> GuardingHook<H> {
    pub fn new(inner: H) -> Self {
        Self {
            inner,
            flag: Arc::new(ScopeFlag::new()),
        }
    }

    pub fn inner(&self) -> &H {
        &self.inner
    }

    pub fn is_propagating(&self) -> bool {
        self.flag.is_raised()
    }
}

impl<H: SpotHook> SpotHook for GuardingHook<H> {
    fn set(&self, cell: Option<CellId>) {
        let Some(_guard) = self.flag.try_raise() else {
            tracing::trace!("Dropped echo of {:?}", cell);
            return;
        };

        self.inner.set(cell);
    }

    fn set_listener(&self, listener: CellListener) {
        let flag = Arc::clone(&self.flag);
        self.inner.set_listener(Arc::new(move |cell| {
            let _hold = flag.hold();
            listener(cell);
        }));
    }

    fn close(&self) {
        self.inner.close();
    }
}
