#[macro_use]
pub mod macros;
pub mod log_setup;
pub mod scope_flag;

pub use scope_flag::{FlagGuard, ScopeFlag};

pub const EPSILON: f64 = 1e-6;

pub fn is_debug() -> bool {
    cfg!(debug_assertions)
}
