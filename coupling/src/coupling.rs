//! Mirroring of focus, highlight and navigation between two sessions.

use std::sync::Arc;

use lineage::{LineageGraph, RegisteredGraphs};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::adapters::{FocusSpotHook, HighlightSpotHook, NavigationSpotHook};
use crate::hook::{GuardingHook, SpotHook};
use crate::relay::BranchMapRelay;
use crate::session::Session;

/// Session state that can be mirrored.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum_macros::Display,
    strum_macros::EnumIter,
)]
#[strum(serialize_all = "lowercase")]
pub enum Aspect {
    Focus,
    Highlight,
    Navigation,
}

impl Aspect {
    pub fn hook(self, session: &Arc<Session>) -> Box<dyn SpotHook> {
        let session = Arc::clone(session);
        match self {
            Aspect::Focus => Box::new(FocusSpotHook::new(session)),
            Aspect::Highlight => Box::new(HighlightSpotHook::new(session)),
            Aspect::Navigation => Box::new(NavigationSpotHook::new(session)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CouplingConfig {
    pub focus: bool,
    pub highlight: bool,
    pub navigation: bool,
}

impl Default for CouplingConfig {
    fn default() -> Self {
        Self {
            focus: true,
            highlight: true,
            navigation: true,
        }
    }
}

impl CouplingConfig {
    pub fn from_yaml(yaml: &str) -> anyhow::Result<Self> {
        Ok(serde_yml::from_str(yaml)?)
    }

    pub fn is_enabled(&self, aspect: Aspect) -> bool {
        match aspect {
            Aspect::Focus => self.focus,
            Aspect::Highlight => self.highlight,
            Aspect::Navigation => self.navigation,
        }
    }

    pub fn aspects(&self) -> impl Iterator<Item = Aspect> + '_ {
        Aspect::iter().filter(|&aspect| self.is_enabled(aspect))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum CouplingState {
    Uncoupled,
    Coupled,
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CouplingError {
    #[error("Cannot go from {from} to {to}")]
    InvalidTransition {
        from: CouplingState,
        to: CouplingState,
    },
    #[error("Session \"{session}\" does not show graph \"{graph}\" of the correspondence")]
    GraphMismatch { session: String, graph: String },
}

/// Keeps two sessions looking at corresponding cells.
///
/// Lifecycle is `Uncoupled -> Coupled -> Closed`; a closed coupling stays
/// closed. Dropping the coupling closes it.
pub struct SessionCoupling {
    session_a: Arc<Session>,
    session_b: Arc<Session>,
    graphs: RegisteredGraphs,
    config: CouplingConfig,
    state: CouplingState,
    hooks: Vec<Arc<dyn SpotHook>>,
}

impl SessionCoupling {
    /// `graphs` maps the graph of `session_a` onto the graph of `session_b`.
    pub fn new(
        session_a: Arc<Session>,
        session_b: Arc<Session>,
        graphs: RegisteredGraphs,
        config: CouplingConfig,
    ) -> Self {
        Self {
            session_a,
            session_b,
            graphs,
            config,
            state: CouplingState::Uncoupled,
            hooks: Vec::new(),
        }
    }

    /// Creates and couples in one step.
    pub fn connect(
        session_a: Arc<Session>,
        session_b: Arc<Session>,
        graphs: RegisteredGraphs,
        config: CouplingConfig,
    ) -> Result<Self, CouplingError> {
        let mut coupling = Self::new(session_a, session_b, graphs, config);
        coupling.couple()?;
        Ok(coupling)
    }

    pub fn state(&self) -> CouplingState {
        self.state
    }

    pub fn config(&self) -> &CouplingConfig {
        &self.config
    }

    pub fn couple(&mut self) -> Result<(), CouplingError> {
        if self.state != CouplingState::Uncoupled {
            return Err(CouplingError::InvalidTransition {
                from: self.state,
                to: CouplingState::Coupled,
            });
        }
        check_graph(&self.session_a, self.graphs.graph_a())?;
        check_graph(&self.session_b, self.graphs.graph_b())?;

        for aspect in self.config.aspects() {
            let hook_a: Arc<dyn SpotHook> =
                Arc::new(GuardingHook::new(aspect.hook(&self.session_a)));
            let hook_b: Arc<dyn SpotHook> =
                Arc::new(GuardingHook::new(aspect.hook(&self.session_b)));

            hook_a.set_listener(
                BranchMapRelay::new(self.graphs.clone(), Arc::clone(&hook_b)).into_listener(),
            );
            hook_b.set_listener(
                BranchMapRelay::new(self.graphs.reversed(), Arc::clone(&hook_a)).into_listener(),
            );

            self.hooks.push(hook_a);
            self.hooks.push(hook_b);
        }

        self.state = CouplingState::Coupled;
        tracing::info!(
            "Coupled sessions \"{}\" and \"{}\"",
            self.session_a.name(),
            self.session_b.name()
        );

        Ok(())
    }

    /// Detaches every hook from its session. Idempotent.
    pub fn close(&mut self) {
        if self.state == CouplingState::Closed {
            return;
        }

        for hook in self.hooks.drain(..) {
            hook.close();
        }
        self.state = CouplingState::Closed;
        tracing::info!(
            "Closed coupling of \"{}\" and \"{}\"",
            self.session_a.name(),
            self.session_b.name()
        );
    }
}

impl std::fmt::Debug for SessionCoupling {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCoupling")
            .field("session_a", &self.session_a.name())
            .field("session_b", &self.session_b.name())
            .field("config", &self.config)
            .field("state", &self.state)
            .field("hooks", &self.hooks.len())
            .finish()
    }
}

impl Drop for SessionCoupling {
    fn drop(&mut self) {
        self.close();
    }
}

fn check_graph(session: &Session, expected: &Arc<LineageGraph>) -> Result<(), CouplingError> {
    if Arc::ptr_eq(session.graph(), expected) {
        return Ok(());
    }

    Err(CouplingError::GraphMismatch {
        session: session.name().to_string(),
        graph: expected.name().to_string(),
    })
}
