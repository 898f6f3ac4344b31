use super::{PhaseSplit, SolverOptions, Verbosity};
use crate::errors::{FlashError, FlashResult};
use crate::state::EquilibriumState;
use crate::{log_iter, log_result};
use ndarray::Array1;

const MAX_ITER_FLASH: usize = 50;
const TOL_FLASH: f64 = 1e-10;

/// # Flash calculations
impl EquilibriumState {
    /// Perform an isothermal flash calculation on the stored feed.
    ///
    /// This is a shorthand for [`solve_flash`] with the stored feed
    /// composition, equilibrium constants and feed flow.
    ///
    /// # Errors
    ///
    /// Returns a [`FlashError`] for degenerate equilibrium constants or if
    /// the iteration does not converge.
    pub fn flash(
        &self,
        initial_beta: Option<f64>,
        options: SolverOptions,
    ) -> FlashResult<PhaseSplit> {
        solve_flash(
            self.molefracs(),
            self.k_values(),
            self.feed_flow(),
            initial_beta,
            options,
        )
    }
}

/// The Rachford-Rice residual `Σ z_i (K_i - 1) / (1 + β (K_i - 1))`.
///
/// Its root in `beta`, the vapor fraction of the feed, is the two-phase
/// equilibrium split. The residual is monotonically decreasing in `beta`
/// over the physical domain whenever at least one `K_i` differs from 1.
pub fn rachford_rice_residual(beta: f64, feed_molefracs: &Array1<f64>, k: &Array1<f64>) -> f64 {
    (feed_molefracs * &((k - 1.0) / (1.0 - beta + beta * k))).sum()
}

/// Computes the equilibrium split of a feed stream with composition
/// `feed_molefracs` and equilibrium constants `k` at a total molar feed
/// flow of `feed_flow`.
///
/// The vapor fraction is determined with Newton's method starting from
/// `initial_beta` (0.5 if [None]). If the residual at the endpoints of the
/// unit interval shows that no two-phase solution exists, or the iteration
/// converges to a vapor fraction outside of it, the result collapses to a
/// single phase carrying the entire feed.
///
/// # Errors
///
/// Returns a [`FlashError`] for inconsistent or non-physical inputs, if all
/// equilibrium constants are unity, or if the iteration does not converge
/// within the maximum number of iterations.
pub fn solve_flash(
    feed_molefracs: &Array1<f64>,
    k: &Array1<f64>,
    feed_flow: f64,
    initial_beta: Option<f64>,
    options: SolverOptions,
) -> FlashResult<PhaseSplit> {
    let z = feed_molefracs;
    if z.len() != k.len() {
        return Err(FlashError::IncompatibleComponents(k.len(), z.len()));
    }
    if !feed_flow.is_finite() || feed_flow < 0.0 {
        return Err(FlashError::InvalidState(
            String::from("solve_flash"),
            String::from("feed flow"),
            feed_flow,
        ));
    }
    for &ki in k {
        if !ki.is_finite() || ki <= 0.0 {
            return Err(FlashError::InvalidState(
                String::from("solve_flash"),
                String::from("K"),
                ki,
            ));
        }
    }
    if k.iter().all(|&ki| (ki - 1.0).abs() < f64::EPSILON) {
        return Err(FlashError::DegenerateEquilibrium);
    }

    // The residual at the interval endpoints decides whether a two-phase
    // solution exists. Strictly outside of these bounds the root lies
    // beyond the unit interval and the feed leaves in a single phase. A
    // root exactly at an endpoint (bubble or dew point) falls through to
    // the iteration so the incipient phase keeps its composition.
    if rachford_rice_residual(0.0, z, k) < 0.0 {
        return Ok(all_liquid(z, feed_flow));
    }
    if rachford_rice_residual(1.0, z, k) > 0.0 {
        return Ok(all_vapor(z, feed_flow));
    }

    let beta = newton(z, k, initial_beta.unwrap_or(0.5), options)?;
    if beta > 1.0 {
        Ok(all_vapor(z, feed_flow))
    } else if beta < 0.0 {
        Ok(all_liquid(z, feed_flow))
    } else {
        let x = z / &(1.0 - beta + beta * k);
        let y = &x * k;
        let vapor_flow = beta * feed_flow;
        Ok(PhaseSplit {
            vapor_flow,
            liquid_flow: feed_flow - vapor_flow,
            vapor_molefracs: y,
            liquid_molefracs: x,
            vapor_fraction: beta,
        })
    }
}

fn newton(
    z: &Array1<f64>,
    k: &Array1<f64>,
    initial_beta: f64,
    options: SolverOptions,
) -> FlashResult<f64> {
    let (max_iter, tol, verbosity) = options.unwrap_or(MAX_ITER_FLASH, TOL_FLASH);

    let mut beta = initial_beta;
    log_iter!(verbosity, " iter |    residual    |      beta      ");
    log_iter!(verbosity, "{:-<40}", "");
    for iter in 1..=max_iter {
        let frac = (k - 1.0) / (1.0 - beta + beta * k);
        let g = (z * &frac).sum();
        let dg = -(z * &frac * &frac).sum();
        log_iter!(verbosity, " {:4} | {:14.8e} | {:14.8e}", iter, g, beta);
        if g.abs() < tol {
            log_result!(
                verbosity,
                "Rachford-Rice: calculation converged in {} step(s)\n",
                iter
            );
            return Ok(beta);
        }
        if dg == 0.0 || !dg.is_finite() {
            return Err(FlashError::IterationFailed(String::from("rachford_rice")));
        }
        beta -= g / dg;
        if !beta.is_finite() {
            return Err(FlashError::IterationFailed(String::from("rachford_rice")));
        }
    }
    Err(FlashError::NotConverged(String::from("Rachford-Rice")))
}

fn all_vapor(z: &Array1<f64>, feed_flow: f64) -> PhaseSplit {
    PhaseSplit {
        vapor_flow: feed_flow,
        liquid_flow: 0.0,
        vapor_molefracs: z.clone(),
        liquid_molefracs: Array1::zeros(z.len()),
        vapor_fraction: 1.0,
    }
}

fn all_liquid(z: &Array1<f64>, feed_flow: f64) -> PhaseSplit {
    PhaseSplit {
        vapor_flow: 0.0,
        liquid_flow: feed_flow,
        vapor_molefracs: Array1::zeros(z.len()),
        liquid_molefracs: z.clone(),
        vapor_fraction: 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::arr1;

    #[test]
    fn residual_at_the_interval_endpoints() {
        let z = arr1(&[0.3, 0.2, 0.5]);
        let k = arr1(&[2.5, 1.1, 0.4]);
        let g0 = (&z * &(&k - 1.0)).sum();
        let g1 = (&z * &(&k - 1.0) / &k).sum();
        assert_relative_eq!(rachford_rice_residual(0.0, &z, &k), g0, max_relative = 1e-14);
        assert_relative_eq!(rachford_rice_residual(1.0, &z, &k), g1, max_relative = 1e-14);
    }

    #[test]
    fn binary_equimolar_split() -> crate::FlashResult<()> {
        let z = arr1(&[0.5, 0.5]);
        let k = arr1(&[2.0, 0.5]);
        let split = solve_flash(&z, &k, 10.0, None, SolverOptions::default())?;

        assert_relative_eq!(split.vapor_fraction, 0.5, max_relative = 1e-10);
        assert_relative_eq!(split.vapor_flow, 5.0, max_relative = 1e-10);
        assert_relative_eq!(split.liquid_flow, 5.0, max_relative = 1e-10);
        assert_relative_eq!(split.liquid_molefracs[0], 1.0 / 3.0, max_relative = 1e-10);
        assert_relative_eq!(split.liquid_molefracs[1], 2.0 / 3.0, max_relative = 1e-10);
        // y = K x holds exactly for the converged split
        for i in 0..2 {
            assert_relative_eq!(
                split.vapor_molefracs[i],
                k[i] * split.liquid_molefracs[i],
                max_relative = 1e-14
            );
        }
        Ok(())
    }

    #[test]
    fn two_phase_split_is_closed() -> crate::FlashResult<()> {
        let z = arr1(&[0.3, 0.2, 0.5]);
        let k = arr1(&[2.5, 1.1, 0.4]);
        let feed_flow = 7.5;
        let split = solve_flash(&z, &k, feed_flow, None, SolverOptions::default())?;

        assert!(split.vapor_fraction > 0.0 && split.vapor_fraction < 1.0);
        assert_relative_eq!(
            split.vapor_flow + split.liquid_flow,
            feed_flow,
            max_relative = 1e-12
        );
        assert_relative_eq!(split.liquid_molefracs.sum(), 1.0, max_relative = 1e-10);
        assert_relative_eq!(split.vapor_molefracs.sum(), 1.0, max_relative = 1e-10);
        Ok(())
    }

    #[test]
    fn collapses_to_all_vapor() -> crate::FlashResult<()> {
        let z = arr1(&[0.5, 0.5]);
        let k = arr1(&[4.0, 2.0]);
        let split = solve_flash(&z, &k, 3.0, None, SolverOptions::default())?;

        assert!(split.is_all_vapor());
        assert_relative_eq!(split.vapor_flow, 3.0, max_relative = 1e-14);
        assert_eq!(split.liquid_flow, 0.0);
        assert_eq!(split.vapor_molefracs, z);
        assert!(split.liquid_molefracs.iter().all(|&xi| xi == 0.0));
        Ok(())
    }

    #[test]
    fn collapses_to_all_liquid() -> crate::FlashResult<()> {
        let z = arr1(&[0.5, 0.5]);
        let k = arr1(&[0.25, 0.5]);
        let split = solve_flash(&z, &k, 3.0, None, SolverOptions::default())?;

        assert!(split.is_all_liquid());
        assert_relative_eq!(split.liquid_flow, 3.0, max_relative = 1e-14);
        assert_eq!(split.vapor_flow, 0.0);
        assert_eq!(split.liquid_molefracs, z);
        assert!(split.vapor_molefracs.iter().all(|&yi| yi == 0.0));
        Ok(())
    }

    #[test]
    fn bubble_point_keeps_the_incipient_vapor() -> crate::FlashResult<()> {
        // g(0) = 0.5 * 0.5 + 0.5 * (-0.5) is exactly zero, so the root
        // sits at the liquid endpoint and the feed is at its bubble point.
        let z = arr1(&[0.5, 0.5]);
        let k = arr1(&[1.5, 0.5]);
        let split = solve_flash(&z, &k, 4.0, None, SolverOptions::default())?;

        assert!(split.vapor_fraction >= 0.0 && split.vapor_fraction < 1e-9);
        assert!(split.vapor_flow.abs() < 1e-8);
        assert_relative_eq!(split.liquid_flow, 4.0, max_relative = 1e-9);
        // the liquid keeps the feed composition, the incipient vapor is
        // y = K z instead of an all-zero composition
        for i in 0..2 {
            assert_relative_eq!(split.liquid_molefracs[i], z[i], max_relative = 1e-9);
            assert_relative_eq!(split.vapor_molefracs[i], k[i] * z[i], max_relative = 1e-9);
        }
        Ok(())
    }

    #[test]
    fn dew_point_keeps_the_incipient_liquid() -> crate::FlashResult<()> {
        // g(1) = (2/3) / 2 - (1/3) is exactly zero, so the root sits at
        // the vapor endpoint and the feed is at its dew point.
        let z = arr1(&[2.0 / 3.0, 1.0 / 3.0]);
        let k = arr1(&[2.0, 0.5]);
        let split = solve_flash(&z, &k, 4.0, Some(1.0), SolverOptions::default())?;

        assert_eq!(split.vapor_fraction, 1.0);
        assert_relative_eq!(split.vapor_flow, 4.0, max_relative = 1e-14);
        assert_eq!(split.liquid_flow, 0.0);
        // the vapor keeps the feed composition, the incipient liquid is
        // x = z / K instead of an all-zero composition
        for i in 0..2 {
            assert_relative_eq!(split.vapor_molefracs[i], z[i], max_relative = 1e-14);
            assert_relative_eq!(split.liquid_molefracs[i], z[i] / k[i], max_relative = 1e-14);
        }
        Ok(())
    }

    #[test]
    fn negative_zero_feed_flow_is_accepted() -> crate::FlashResult<()> {
        let z = arr1(&[0.5, 0.5]);
        let k = arr1(&[2.0, 0.5]);
        let split = solve_flash(&z, &k, -0.0, None, SolverOptions::default())?;
        assert_eq!(split.vapor_flow, 0.0);
        assert_eq!(split.liquid_flow, 0.0);
        Ok(())
    }

    #[test]
    fn unit_k_values_are_degenerate() {
        let z = arr1(&[0.5, 0.5]);
        let k = arr1(&[1.0, 1.0]);
        assert!(matches!(
            solve_flash(&z, &k, 1.0, None, SolverOptions::default()),
            Err(FlashError::DegenerateEquilibrium)
        ));
    }

    #[test]
    fn inconsistent_inputs_are_rejected() {
        let z = arr1(&[0.5, 0.5]);
        let k = arr1(&[2.0, 0.5]);
        assert!(matches!(
            solve_flash(&arr1(&[1.0]), &k, 1.0, None, SolverOptions::default()),
            Err(FlashError::IncompatibleComponents(2, 1))
        ));
        assert!(matches!(
            solve_flash(&z, &k, -1.0, None, SolverOptions::default()),
            Err(FlashError::InvalidState(_, _, _))
        ));
        assert!(matches!(
            solve_flash(&z, &arr1(&[2.0, -0.5]), 1.0, None, SolverOptions::default()),
            Err(FlashError::InvalidState(_, _, _))
        ));
    }

    #[test]
    fn iteration_cap_is_enforced() {
        let z = arr1(&[0.3, 0.2, 0.5]);
        let k = arr1(&[2.5, 1.1, 0.4]);
        let options = SolverOptions::new().max_iter(1).tol(1e-16);
        assert!(matches!(
            solve_flash(&z, &k, 1.0, None, options),
            Err(FlashError::NotConverged(_))
        ));
    }
}
