//! Protocol presets
//!
//! Gantree: L3_Estimate → Protocol
//!
//! Preparation, drive and shot count each protocol is normally run with.

use qest_core::{protocol, BlochVector, ControlInput, Parameter, QestResult, Samples};
use qest_dynamics::QuantumState;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Shots for the γ₁ readout
pub const GAMMA1_SAMPLES: Samples = 1_000_000;

/// Shots for every other protocol
pub const DEFAULT_SAMPLES: Samples = 100_000;

/// Initial Bloch vector of a protocol
/// Gantree: preparation(parameter) -> BlochVector // 초기 상태
///
/// γ₁ and κ start from |1⟩; γ₂ and ω start from |+i⟩.
pub fn preparation(parameter: Parameter) -> BlochVector {
    match parameter {
        Parameter::Gamma1 | Parameter::Kappa => BlochVector::KET_1,
        Parameter::Gamma2 | Parameter::Omega => BlochVector::KET_PLUS_I,
    }
}

/// Fresh probe state for a protocol
pub fn prepared_state(parameter: Parameter) -> QuantumState {
    QuantumState::prepared(preparation(parameter))
}

/// Drive a protocol runs with
pub fn default_control(parameter: Parameter) -> QestResult<ControlInput> {
    match parameter {
        Parameter::Kappa => ControlInput::new(protocol::KAPPA_DRIVE),
        _ => Ok(ControlInput::idle()),
    }
}

/// Shot count a protocol runs with
pub fn default_samples(parameter: Parameter) -> Samples {
    match parameter {
        Parameter::Gamma1 => GAMMA1_SAMPLES,
        _ => DEFAULT_SAMPLES,
    }
}

/// One protocol run: which parameter, which drive, how many shots
/// Gantree: ProtocolPlan // 실행 계획
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProtocolPlan {
    /// Target parameter
    pub parameter: Parameter,

    /// Drive
    pub control: ControlInput,

    /// Shots per mean
    pub samples: Samples,
}

impl ProtocolPlan {
    /// Standard plan for `parameter`
    pub fn standard(parameter: Parameter) -> QestResult<Self> {
        Ok(Self {
            parameter,
            control: default_control(parameter)?,
            samples: default_samples(parameter),
        })
    }

    /// Builder: shots
    pub fn with_samples(mut self, samples: Samples) -> Self {
        self.samples = samples;
        self
    }

    /// Builder: drive
    pub fn with_control(mut self, control: ControlInput) -> Self {
        self.control = control;
        self
    }
}

impl fmt::Display for ProtocolPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}, n={}, from {}",
            self.parameter,
            self.control,
            self.samples,
            preparation(self.parameter)
        )
    }
}
