use std::fmt::{Display, Formatter, Debug};
use std::error::Error;

use tt8_sim::error::SimulationError;
use tt8_sim::processor::decoder::Register;

pub type CheckResult<T> = std::result::Result<T, CheckError>;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum CheckErrorKind {
    Mismatch,
    CarryTiming,
    Simulation
}
impl CheckErrorKind {
    pub(self) fn as_str(&self) -> &'static str {
        match *self {
            CheckErrorKind::Mismatch => "read back mismatch",
            CheckErrorKind::CarryTiming => "carry flag committed at the wrong edge",
            CheckErrorKind::Simulation => "simulation error"
        }
    }
}

enum ErrorSource {
    Mismatch { register: Register, expected: u8, found: u8 },
    Internal(CheckErrorKind),
    Simulation(SimulationError)
}
impl Debug for ErrorSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match *self {
            ErrorSource::Mismatch { register, expected, found } => f.debug_struct("Mismatch")
                .field("register", &register)
                .field("expected", &expected)
                .field("found", &found)
                .finish(),
            ErrorSource::Internal(kind) => f.debug_tuple("Kind").field(&kind).finish(),
            ErrorSource::Simulation(ref e) => Debug::fmt(e, f)
        }
    }
}

/// A failed self-test check.
pub struct CheckError {
    source: ErrorSource
}
impl CheckError {
    pub fn mismatch(register: Register, expected: u8, found: u8) -> Self {
        CheckError {
            source: ErrorSource::Mismatch { register, expected, found }
        }
    }

    pub fn kind(&self) -> CheckErrorKind {
        match self.source {
            ErrorSource::Mismatch { .. } => CheckErrorKind::Mismatch,
            ErrorSource::Internal(kind) => kind,
            ErrorSource::Simulation(_) => CheckErrorKind::Simulation
        }
    }

    /// The register that read back wrong, for mismatches.
    pub fn register(&self) -> Option<Register> {
        match self.source {
            ErrorSource::Mismatch { register, .. } => Some(register),
            _ => None
        }
    }
}
impl From<CheckErrorKind> for CheckError {
    fn from(kind: CheckErrorKind) -> Self {
        CheckError {
            source: ErrorSource::Internal(kind)
        }
    }
}
impl From<SimulationError> for CheckError {
    fn from(error: SimulationError) -> Self {
        CheckError {
            source: ErrorSource::Simulation(error)
        }
    }
}
impl Debug for CheckError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Debug::fmt(&self.source, f)
    }
}
impl Display for CheckError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.source {
            ErrorSource::Mismatch { register, expected, found } =>
                write!(f, "{}: {} read back {:#04X}, expected {:#04X}", CheckErrorKind::Mismatch.as_str(), register, found, expected),
            ErrorSource::Internal(kind) => f.write_str(kind.as_str()),
            ErrorSource::Simulation(ref e) => write!(f, "{}: {}", CheckErrorKind::Simulation.as_str(), e)
        }
    }
}
impl Error for CheckError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self.source {
            ErrorSource::Simulation(ref e) => Some(e),
            _ => None
        }
    }
}

#[cfg(test)]
mod test {
    use tt8_sim::error::SimulationError;
    use tt8_sim::processor::decoder::Register;

    use crate::error::{CheckError, CheckErrorKind};

    #[test]
    fn mismatch_message() {
        let error = CheckError::mismatch(Register::from_nibble(7), 0x34, 0x12);
        assert_eq!(error.kind(), CheckErrorKind::Mismatch);
        assert_eq!(error.register(), Some(Register::from_nibble(7)));
        assert_eq!(error.to_string(), "read back mismatch: r7 read back 0x12, expected 0x34");
    }

    #[test]
    fn wraps_simulation_errors() {
        let error = CheckError::from(SimulationError::unimplemented_instruction(0x4A));
        assert_eq!(error.kind(), CheckErrorKind::Simulation);
        assert!(std::error::Error::source(&error).is_some());
        assert_eq!(CheckError::from(CheckErrorKind::CarryTiming).register(), None);
    }
}
