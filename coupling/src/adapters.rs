//! Hooks over the native observables of a [`Session`].

use std::sync::Arc;

use lineage::CellId;

use crate::hook::{NativeRegistration, SpotHook};
use crate::session::{CellListener, Session};

/// Focused cell of a session.
#[derive(Debug)]
pub struct FocusSpotHook {
    session: Arc<Session>,
    registration: NativeRegistration,
}

impl FocusSpotHook {
    pub fn new(session: Arc<Session>) -> Self {
        Self {
            session,
            registration: NativeRegistration::default(),
        }
    }
}

impl SpotHook for FocusSpotHook {
    fn set(&self, cell: Option<CellId>) {
        if !self.registration.is_closed() {
            self.session.focus().focus(cell);
        }
    }

    fn set_listener(&self, listener: CellListener) {
        self.registration
            .attach(|| self.session.focus().add_listener(listener));
    }

    fn close(&self) {
        if let Some(id) = self.registration.detach() {
            self.session.focus().remove_listener(id);
        }
    }
}

/// Highlighted cell of a session.
#[derive(Debug)]
pub struct HighlightSpotHook {
    session: Arc<Session>,
    registration: NativeRegistration,
}

impl HighlightSpotHook {
    pub fn new(session: Arc<Session>) -> Self {
        Self {
            session,
            registration: NativeRegistration::default(),
        }
    }
}

impl SpotHook for HighlightSpotHook {
    fn set(&self, cell: Option<CellId>) {
        if !self.registration.is_closed() {
            self.session.highlight().highlight(cell);
        }
    }

    fn set_listener(&self, listener: CellListener) {
        self.registration
            .attach(|| self.session.highlight().add_listener(listener));
    }

    fn close(&self) {
        if let Some(id) = self.registration.detach() {
            self.session.highlight().remove_listener(id);
        }
    }
}

/// Navigation requests of a session. There is nothing to navigate to for `None`.
#[derive(Debug)]
pub struct NavigationSpotHook {
    session: Arc<Session>,
    registration: NativeRegistration,
}

impl NavigationSpotHook {
    pub fn new(session: Arc<Session>) -> Self {
        Self {
            session,
            registration: NativeRegistration::default(),
        }
    }
}

impl SpotHook for NavigationSpotHook {
    fn set(&self, cell: Option<CellId>) {
        if self.registration.is_closed() {
            return;
        }
        if let Some(cell) = cell {
            self.session.navigation().navigate_to(cell);
        }
    }

    fn set_listener(&self, listener: CellListener) {
        self.registration
            .attach(|| self.session.navigation().add_listener(listener));
    }

    fn close(&self) {
        if let Some(id) = self.registration.detach() {
            self.session.navigation().remove_listener(id);
        }
    }
}
