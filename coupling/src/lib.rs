//! Live coupling of two lineage sessions.
//!
//! Focus, highlight and navigation of one session are mirrored onto the
//! corresponding branch of the other session through a
//! [`RegisteredGraphs`](lineage::RegisteredGraphs) correspondence:
//!
//! ```text
//! session A -> adapter -> GuardingHook -> BranchMapRelay(A->B) -> GuardingHook -> adapter -> session B
//!           <-                        <- BranchMapRelay(B->A) <-                         <-
//! ```
//!
//! The guarding hooks make sure a change crosses over once and its echo is
//! dropped.

pub mod adapters;
pub mod coupling;
pub mod hook;
pub mod relay;
pub mod session;

#[cfg(test)]
mod test_utils;

pub use adapters::{FocusSpotHook, HighlightSpotHook, NavigationSpotHook};
pub use coupling::{Aspect, CouplingConfig, CouplingError, CouplingState, SessionCoupling};
pub use hook::{GuardingHook, SpotHook};
pub use relay::BranchMapRelay;
pub use session::{CellListener, FocusModel, HighlightModel, ListenerId, NavigationHandler, Session};
