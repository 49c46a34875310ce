//! Error types for LabEngine.
//!
//! Every failure here is local: a failing simulation or a bad config never
//! takes down the rest of the host.

use std::fmt;

/// Errors raised while advancing a simulation.
#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    /// A state quantity became NaN or infinite.
    Diverged { quantity: String },
    /// The simulation could not build its state for the current surface.
    InvalidGeometry(String),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::Diverged { quantity } => {
                write!(f, "Simulation diverged: {} is not finite", quantity)
            }
            SimError::InvalidGeometry(msg) => write!(f, "Invalid simulation geometry: {}", msg),
        }
    }
}

impl std::error::Error for SimError {}

/// Errors raised by the host driver and its collaborators.
#[derive(Debug)]
pub enum HostError {
    /// The requested scenario id is not registered.
    UnknownScenario(String),
    /// An operation needed an active simulation but none is selected.
    NoActiveSimulation,
    /// The rendering surface is missing or unusable.
    Surface(String),
    /// The lab configuration could not be parsed.
    Config(serde_json::Error),
    /// The active simulation failed during a frame.
    Simulation(SimError),
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostError::UnknownScenario(id) => write!(f, "Unknown scenario: {}", id),
            HostError::NoActiveSimulation => write!(f, "No simulation is active"),
            HostError::Surface(msg) => write!(f, "Rendering surface unavailable: {}", msg),
            HostError::Config(e) => write!(f, "Invalid lab configuration: {}", e),
            HostError::Simulation(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for HostError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HostError::Config(e) => Some(e),
            HostError::Simulation(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for HostError {
    fn from(e: serde_json::Error) -> Self {
        HostError::Config(e)
    }
}

impl From<SimError> for HostError {
    fn from(e: SimError) -> Self {
        HostError::Simulation(e)
    }
}
