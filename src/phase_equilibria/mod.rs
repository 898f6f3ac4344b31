//! Vapor-liquid phase splits and the Rachford-Rice flash solver.
use ndarray::Array1;
use std::fmt;

mod flash;
pub use flash::{rachford_rice_residual, solve_flash};

/// Level of detail in the iteration output.
#[derive(Copy, Clone, PartialOrd, PartialEq, Eq)]
pub enum Verbosity {
    /// Do not print output.
    None,
    /// Print information about the success or failure of the iteration.
    Result,
    /// Print a detailed output for every iteration.
    Iter,
}

impl Default for Verbosity {
    fn default() -> Self {
        Self::None
    }
}

/// Options for the flash solver.
///
/// If the values are [None], solver specific default
/// values are used.
#[derive(Copy, Clone, Default)]
pub struct SolverOptions {
    /// Maximum number of iterations.
    pub max_iter: Option<usize>,
    /// Tolerance.
    pub tol: Option<f64>,
    /// Iteration output indicated by the [Verbosity] enum.
    pub verbosity: Verbosity,
}

impl SolverOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = Some(max_iter);
        self
    }

    pub fn tol(mut self, tol: f64) -> Self {
        self.tol = Some(tol);
        self
    }

    pub fn verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn unwrap_or(self, max_iter: usize, tol: f64) -> (usize, f64, Verbosity) {
        (
            self.max_iter.unwrap_or(max_iter),
            self.tol.unwrap_or(tol),
            self.verbosity,
        )
    }
}

/// The equilibrium split of a feed stream into a liquid and a vapor phase.
///
/// A feed that flashes into a single phase is represented by the degenerate
/// split in which the other phase carries zero flow and a zero composition
/// vector.
#[derive(Debug, Clone)]
pub struct PhaseSplit {
    /// Molar flow of the vapor phase.
    pub vapor_flow: f64,
    /// Molar flow of the liquid phase.
    pub liquid_flow: f64,
    /// Vapor phase mole fractions.
    pub vapor_molefracs: Array1<f64>,
    /// Liquid phase mole fractions.
    pub liquid_molefracs: Array1<f64>,
    /// Fraction of the feed leaving in the vapor phase.
    pub vapor_fraction: f64,
}

impl PhaseSplit {
    /// The feed left the stage entirely as vapor.
    pub fn is_all_vapor(&self) -> bool {
        self.vapor_fraction >= 1.0
    }

    /// The feed left the stage entirely as liquid.
    pub fn is_all_liquid(&self) -> bool {
        self.vapor_fraction <= 0.0
    }
}

impl fmt::Display for PhaseSplit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "vapor: flow = {}, molefracs = {}",
            self.vapor_flow, self.vapor_molefracs
        )?;
        write!(
            f,
            "liquid: flow = {}, molefracs = {}",
            self.liquid_flow, self.liquid_molefracs
        )
    }
}
