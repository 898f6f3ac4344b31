//! Structures and traits used to build volatility parameters for flash
//! calculations from pure substance records.

use serde::de::DeserializeOwned;
use std::io;
use std::path::Path;
use thiserror::Error;

mod identifier;
mod model_record;

pub use identifier::{Identifier, IdentifierOption};
pub use model_record::PureRecord;

/// Constructor methods for parameters.
///
/// By implementing `Parameter` for a type, you define how a parameter
/// set can be constructed from a sequence of single substance records.
pub trait Parameter
where
    Self: Sized,
{
    type Pure: Clone + DeserializeOwned;

    /// Creates parameters from records for pure substances.
    fn from_records(pure_records: Vec<PureRecord<Self::Pure>>) -> Result<Self, ParameterError>;

    /// Creates parameters for a pure component from a pure record.
    fn new_pure(pure_record: PureRecord<Self::Pure>) -> Result<Self, ParameterError> {
        Self::from_records(vec![pure_record])
    }

    /// Creates parameters from model records with default identifiers.
    fn from_model_records(model_records: Vec<Self::Pure>) -> Result<Self, ParameterError> {
        let pure_records = model_records
            .into_iter()
            .map(|r| PureRecord::new(Default::default(), r))
            .collect();
        Self::from_records(pure_records)
    }

    /// Creates parameters from substance information stored in a json file.
    fn from_json<P>(
        substances: Vec<&str>,
        file: P,
        identifier_option: IdentifierOption,
    ) -> Result<Self, ParameterError>
    where
        P: AsRef<Path>,
    {
        Self::from_records(PureRecord::from_json(&substances, file, identifier_option)?)
    }

    /// Return the original pure records that were used to construct the parameters.
    fn records(&self) -> &[PureRecord<Self::Pure>];
}

/// Error type for incomplete or inconsistent parameter information.
#[derive(Error, Debug)]
pub enum ParameterError {
    #[error(transparent)]
    FileIO(#[from] io::Error),
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
    #[error("The following component(s) were not found: {0}")]
    ComponentsNotFound(String),
    #[error("Unknown saturation pressure equation {equation} for component {component}.")]
    UnknownEquation { component: usize, equation: usize },
    #[error("Incompatible parameters: {0}")]
    IncompatibleParameters(String),
}
