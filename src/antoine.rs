//! Saturation vapor pressure correlations of the Antoine type.
//!
//! This module acts as the volatility model for the flash calculation.
//! Three correlation forms are supported, selected per component by the
//! `eqn` field of its record:
//!
//! 1. the three-coefficient Antoine equation with pressures in bar,
//! 2. a five-coefficient extended form with pressures in pascal,
//! 3. the Antoine equation with coefficients fitted to pressures in mmHg.
//!
//! Coefficient sets for many substances are available from the
//! [DDBST Antoine calculation page](http://ddbonline.ddbst.com/AntoineCalculation/AntoineCalculationCGI.exe).
use crate::errors::{FlashError, FlashResult};
use crate::parameter::{Parameter, ParameterError, PureRecord};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::fmt;

/// mmHg per standard atmosphere.
const MMHG_PER_ATM: f64 = 760.0;
/// Pascal per standard atmosphere.
const PA_PER_ATM: f64 = 101325.0;

/// Saturation pressure coefficients for a single substance.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AntoineRecord {
    /// Saturation pressure equation (1, 2 or 3).
    pub eqn: usize,
    /// Correlation coefficients. Equations 1 and 3 take three
    /// coefficients, equation 2 takes five.
    pub coeffs: Vec<f64>,
}

impl AntoineRecord {
    /// Create a new `AntoineRecord`.
    pub fn new(eqn: usize, coeffs: Vec<f64>) -> Self {
        Self { eqn, coeffs }
    }
}

impl fmt::Display for AntoineRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AntoineRecord(eqn={}, coeffs={:?})", self.eqn, self.coeffs)
    }
}

/// A validated saturation vapor pressure correlation for a single component.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VaporPressureCorrelation {
    /// `p = 10^(a - b / (c + t))` with `p` in bar and `t` in K.
    Antoine { a: f64, b: f64, c: f64 },
    /// `p = exp(a + b / t + c ln(t) + d t^e) / 101325` with `p` in bar
    /// and `t` in K.
    ExtendedAntoine { a: f64, b: f64, c: f64, d: f64, e: f64 },
    /// Same functional form as [`VaporPressureCorrelation::Antoine`] but
    /// with coefficients fitted to pressures in mmHg. The conversion to
    /// bar is applied where K-values are assembled, not here.
    AntoineMmhg { a: f64, b: f64, c: f64 },
}

impl VaporPressureCorrelation {
    fn from_record(component: usize, record: &AntoineRecord) -> Result<Self, ParameterError> {
        let coeffs = |n: usize| -> Result<&[f64], ParameterError> {
            if record.coeffs.len() == n {
                Ok(&record.coeffs)
            } else {
                Err(ParameterError::IncompatibleParameters(format!(
                    "equation {} requires {} coefficients for component {} but {} were given.",
                    record.eqn,
                    n,
                    component,
                    record.coeffs.len()
                )))
            }
        };
        match record.eqn {
            1 => {
                let c = coeffs(3)?;
                Ok(Self::Antoine {
                    a: c[0],
                    b: c[1],
                    c: c[2],
                })
            }
            2 => {
                let c = coeffs(5)?;
                Ok(Self::ExtendedAntoine {
                    a: c[0],
                    b: c[1],
                    c: c[2],
                    d: c[3],
                    e: c[4],
                })
            }
            3 => {
                let c = coeffs(3)?;
                Ok(Self::AntoineMmhg {
                    a: c[0],
                    b: c[1],
                    c: c[2],
                })
            }
            equation => Err(ParameterError::UnknownEquation {
                component,
                equation,
            }),
        }
    }

    /// Saturation vapor pressure at temperature `t` in K.
    ///
    /// The result is in bar for [`VaporPressureCorrelation::Antoine`] and
    /// [`VaporPressureCorrelation::ExtendedAntoine`] and in mmHg for
    /// [`VaporPressureCorrelation::AntoineMmhg`].
    pub fn saturation_pressure(&self, t: f64) -> f64 {
        match self {
            Self::Antoine { a, b, c } | Self::AntoineMmhg { a, b, c } => {
                10_f64.powf(a - b / (c + t))
            }
            Self::ExtendedAntoine { a, b, c, d, e } => {
                (a + b / t + c * t.ln() + d * t.powf(*e)).exp() / PA_PER_ATM
            }
        }
    }
}

/// Saturation pressure correlations for one or more components.
#[derive(Debug)]
pub struct AntoineParameters {
    correlations: Vec<VaporPressureCorrelation>,
    pure_records: Vec<PureRecord<AntoineRecord>>,
}

impl Parameter for AntoineParameters {
    type Pure = AntoineRecord;

    /// Creates parameters from pure component records.
    ///
    /// Unknown equation numbers and coefficient count mismatches are
    /// rejected here, identifying the offending component.
    fn from_records(pure_records: Vec<PureRecord<Self::Pure>>) -> Result<Self, ParameterError> {
        let correlations = pure_records
            .iter()
            .enumerate()
            .map(|(i, record)| VaporPressureCorrelation::from_record(i, &record.model_record))
            .collect::<Result<_, _>>()?;
        Ok(Self {
            correlations,
            pure_records,
        })
    }

    fn records(&self) -> &[PureRecord<AntoineRecord>] {
        &self.pure_records
    }
}

impl AntoineParameters {
    /// The number of components.
    pub fn components(&self) -> usize {
        self.correlations.len()
    }

    /// The validated correlation for every component.
    pub fn correlations(&self) -> &[VaporPressureCorrelation] {
        &self.correlations
    }

    /// Saturation vapor pressures of all components at temperature `t` in K.
    pub fn saturation_pressures(&self, t: f64) -> Array1<f64> {
        self.correlations
            .iter()
            .map(|c| c.saturation_pressure(t))
            .collect()
    }

    /// Equilibrium constants `K_i = p_sat_i / p` at temperature `t` in K
    /// and pressure `p` in bar.
    ///
    /// Correlations fitted to mmHg are rescaled with the 760 mmHg/atm
    /// factor at this point.
    pub fn k_values(&self, t: f64, p: f64) -> FlashResult<Array1<f64>> {
        if !t.is_finite() || t <= 0.0 {
            return Err(FlashError::InvalidState(
                String::from("k_values"),
                String::from("temperature"),
                t,
            ));
        }
        if !p.is_finite() || p <= 0.0 {
            return Err(FlashError::InvalidState(
                String::from("k_values"),
                String::from("pressure"),
                p,
            ));
        }
        Ok(self
            .correlations
            .iter()
            .map(|c| match c {
                VaporPressureCorrelation::AntoineMmhg { .. } => {
                    c.saturation_pressure(t) / (MMHG_PER_ATM * p)
                }
                _ => c.saturation_pressure(t) / p,
            })
            .collect())
    }
}

impl fmt::Display for AntoineParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.pure_records
            .iter()
            .try_for_each(|pr| writeln!(f, "{}", pr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // DDBST, bar and K, valid 292 - 366 K
    fn ethanol() -> AntoineRecord {
        AntoineRecord::new(1, vec![5.24677, 1598.673, -46.424])
    }

    // DIPPR-style extended form, Pa and K
    fn water() -> AntoineRecord {
        AntoineRecord::new(2, vec![73.649, -7258.2, -7.3037, 4.1653e-6, 2.0])
    }

    // mmHg-based coefficients, shifted to T in K
    fn benzene_mmhg() -> AntoineRecord {
        AntoineRecord::new(3, vec![6.90565, 1211.033, -52.36])
    }

    #[test]
    fn antoine_at_normal_boiling_point() -> Result<(), ParameterError> {
        let params = AntoineParameters::from_model_records(vec![ethanol()])?;
        let p_sat = params.saturation_pressures(351.47);
        assert_relative_eq!(p_sat[0], 1.0139, max_relative = 1e-3);
        Ok(())
    }

    #[test]
    fn extended_antoine_at_normal_boiling_point() -> Result<(), ParameterError> {
        let params = AntoineParameters::from_model_records(vec![water()])?;
        let p_sat = params.saturation_pressures(373.15);
        assert_relative_eq!(p_sat[0], 1.0, max_relative = 2e-3);
        Ok(())
    }

    #[test]
    fn mmhg_correlation_is_rescaled_in_k_values() -> FlashResult<()> {
        let params = AntoineParameters::from_model_records(vec![benzene_mmhg()])?;
        let p_sat = params.saturation_pressures(353.25);
        // raw correlation output is in mmHg
        assert_relative_eq!(p_sat[0], 760.05, max_relative = 1e-3);
        // the 1/760 factor only enters the K-values
        let p = 1.01325;
        let k = params.k_values(353.25, p)?;
        assert_relative_eq!(k[0], p_sat[0] / (760.0 * p), max_relative = 1e-12);
        Ok(())
    }

    #[test]
    fn k_values_are_positive_and_reproducible() -> FlashResult<()> {
        let params =
            AntoineParameters::from_model_records(vec![ethanol(), water(), benzene_mmhg()])?;
        let k1 = params.k_values(350.0, 1.0)?;
        let k2 = params.k_values(350.0, 1.0)?;
        assert_eq!(k1.len(), 3);
        assert!(k1.iter().all(|&ki| ki > 0.0));
        assert_relative_eq!(k1, k2, max_relative = 1e-15);
        Ok(())
    }

    #[test]
    fn nonpositive_pressure_is_rejected() {
        let params = AntoineParameters::from_model_records(vec![ethanol()]).unwrap();
        assert!(matches!(
            params.k_values(350.0, 0.0),
            Err(FlashError::InvalidState(_, _, _))
        ));
        assert!(matches!(
            params.k_values(350.0, -1.0),
            Err(FlashError::InvalidState(_, _, _))
        ));
    }

    #[test]
    fn unknown_equation_is_rejected() {
        let result =
            AntoineParameters::from_model_records(vec![ethanol(), AntoineRecord::new(4, vec![0.0; 3])]);
        match result {
            Err(ParameterError::UnknownEquation {
                component,
                equation,
            }) => {
                assert_eq!(component, 1);
                assert_eq!(equation, 4);
            }
            _ => panic!("expected UnknownEquation"),
        }
    }

    #[test]
    fn wrong_coefficient_count_is_rejected() {
        let result = AntoineParameters::from_model_records(vec![AntoineRecord::new(
            2,
            vec![73.649, -7258.2, -7.3037],
        )]);
        assert!(matches!(
            result,
            Err(ParameterError::IncompatibleParameters(_))
        ));
    }
}
