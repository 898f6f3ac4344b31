//! Isothermal vapor-liquid equilibrium flash calculations.
//!
//! The crate computes the equilibrium split of a multicomponent feed stream
//! into liquid and vapor phases at a given temperature and pressure. The
//! equilibrium constants are estimated from Antoine-type saturation vapor
//! pressure correlations and the phase split is obtained as the root of the
//! Rachford-Rice equation.
//!
//! ## Contents
//!
//! - [`antoine`]: saturation vapor pressure correlations and the parameter
//!   set built from them.
//! - [`parameter`]: structures used to read component records from json.
//! - [`EquilibriumState`]: operating conditions and feed of an equilibrium
//!   stage, with the flash calculation itself in [`EquilibriumState::flash`].
#![warn(clippy::all)]

/// Print messages with level `Verbosity::Iter` or higher.
#[macro_export]
macro_rules! log_iter {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= Verbosity::Iter {
            println!($($arg)*);
        }
    }
}

/// Print messages with level `Verbosity::Result` or higher.
#[macro_export]
macro_rules! log_result {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= Verbosity::Result {
            println!($($arg)*);
        }
    }
}

pub mod antoine;
mod errors;
pub mod parameter;
mod phase_equilibria;
mod state;

pub use errors::{FlashError, FlashResult};
pub use phase_equilibria::{
    rachford_rice_residual, solve_flash, PhaseSplit, SolverOptions, Verbosity,
};
pub use state::EquilibriumState;
