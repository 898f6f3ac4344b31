//! Operating conditions and feed of a single equilibrium stage.
use crate::antoine::AntoineParameters;
use crate::errors::{FlashError, FlashResult};
use ndarray::Array1;
use std::fmt;
use std::sync::Arc;

/// Temperature, pressure, feed composition and feed flow of an
/// equilibrium stage, together with the equilibrium constants derived
/// from them.
///
/// The equilibrium constants are computed at construction and recomputed
/// by the consuming [`EquilibriumState::update_temperature`] and
/// [`EquilibriumState::update_pressure`] transitions, so the stored
/// K-values can never disagree with the stored operating conditions.
/// Updating the conditions does not re-run the flash calculation; call
/// [`EquilibriumState::flash`] on the new state to obtain the phase split
/// at the updated conditions.
#[derive(Debug, Clone)]
pub struct EquilibriumState {
    parameters: Arc<AntoineParameters>,
    temperature: f64,
    pressure: f64,
    molefracs: Array1<f64>,
    feed_flow: f64,
    k: Array1<f64>,
}

impl EquilibriumState {
    /// Creates a new equilibrium state and computes the equilibrium
    /// constants.
    ///
    /// `temperature` is in K, `pressure` in bar, `feed_flow` is the total
    /// molar flow of the feed. The feed composition has to match the
    /// number of components in the parameter set. Mole fractions summing
    /// to 1 is the caller's responsibility.
    ///
    /// # Errors
    ///
    /// Returns a [`FlashError`] for non-physical conditions or if the
    /// number of mole fractions does not match the parameter set.
    pub fn new(
        parameters: &Arc<AntoineParameters>,
        temperature: f64,
        pressure: f64,
        molefracs: Array1<f64>,
        feed_flow: f64,
    ) -> FlashResult<Self> {
        validate(temperature, pressure, &molefracs, feed_flow)?;
        if molefracs.len() != parameters.components() {
            return Err(FlashError::IncompatibleComponents(
                parameters.components(),
                molefracs.len(),
            ));
        }
        let k = parameters.k_values(temperature, pressure)?;
        Ok(Self {
            parameters: parameters.clone(),
            temperature,
            pressure,
            molefracs,
            feed_flow,
            k,
        })
    }

    /// Returns a new state at the given temperature in K with recomputed
    /// equilibrium constants.
    pub fn update_temperature(mut self, temperature: f64) -> FlashResult<Self> {
        validate(temperature, self.pressure, &self.molefracs, self.feed_flow)?;
        self.k = self.parameters.k_values(temperature, self.pressure)?;
        self.temperature = temperature;
        Ok(self)
    }

    /// Returns a new state at the given pressure in bar with recomputed
    /// equilibrium constants.
    pub fn update_pressure(mut self, pressure: f64) -> FlashResult<Self> {
        validate(self.temperature, pressure, &self.molefracs, self.feed_flow)?;
        self.k = self.parameters.k_values(self.temperature, pressure)?;
        self.pressure = pressure;
        Ok(self)
    }

    /// Temperature in K.
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Pressure in bar.
    pub fn pressure(&self) -> f64 {
        self.pressure
    }

    /// Feed composition.
    pub fn molefracs(&self) -> &Array1<f64> {
        &self.molefracs
    }

    /// Total molar feed flow.
    pub fn feed_flow(&self) -> f64 {
        self.feed_flow
    }

    /// Equilibrium constants at the stored temperature and pressure.
    pub fn k_values(&self) -> &Array1<f64> {
        &self.k
    }
}

impl fmt::Display for EquilibriumState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "T = {} K, p = {} bar, z = {}, F = {}, K = {}",
            self.temperature, self.pressure, self.molefracs, self.feed_flow, self.k
        )
    }
}

fn validate(
    temperature: f64,
    pressure: f64,
    molefracs: &Array1<f64>,
    feed_flow: f64,
) -> FlashResult<()> {
    if !temperature.is_finite() || temperature <= 0.0 {
        return Err(FlashError::InvalidState(
            String::from("validate"),
            String::from("temperature"),
            temperature,
        ));
    }
    if !pressure.is_finite() || pressure <= 0.0 {
        return Err(FlashError::InvalidState(
            String::from("validate"),
            String::from("pressure"),
            pressure,
        ));
    }
    if !feed_flow.is_finite() || feed_flow < 0.0 {
        return Err(FlashError::InvalidState(
            String::from("validate"),
            String::from("feed flow"),
            feed_flow,
        ));
    }
    for &z in molefracs {
        if !z.is_finite() || z < 0.0 {
            return Err(FlashError::InvalidState(
                String::from("validate"),
                String::from("mole fraction"),
                z,
            ));
        }
    }
    Ok(())
}
