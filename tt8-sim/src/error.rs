use std::fmt::{Display, Formatter, Debug};
use std::error::Error;

pub type SimulationResult<T> = std::result::Result<T, SimulationError>;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SimulationErrorKind {
    UnimplementedInstruction,
    BusUnavailable
}
impl SimulationErrorKind {
    pub(self) fn as_str(&self) -> &'static str {
        match *self {
            SimulationErrorKind::UnimplementedInstruction => "unimplemented instruction",
            SimulationErrorKind::BusUnavailable => "bus unavailable"
        }
    }
}

#[derive(Debug)]
struct CustomError {
    kind: SimulationErrorKind,
    error: Box<dyn Error + Send + Sync>,
}

enum ErrorSource {
    Instruction(u8),
    Internal(SimulationErrorKind),
    External(Box<CustomError>)
}
impl Debug for ErrorSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match *self {
            ErrorSource::Instruction(code) => f.debug_tuple("Instruction").field(&code).finish(),
            ErrorSource::External(ref c) => Debug::fmt(c, f),
            ErrorSource::Internal(kind) => f.debug_tuple("Kind").field(&kind).finish()
        }
    }
}

pub struct SimulationError {
    source: ErrorSource
}
impl SimulationError {
    pub fn new<E>(kind: SimulationErrorKind, error: E) -> Self
    where
        E: Into<Box<dyn Error + Send + Sync>>
    {
        SimulationError {
            source: ErrorSource::External(Box::new(CustomError {
                kind,
                error: error.into()
            }))
        }
    }

    /// Builds the error raised when the command byte carries an opcode outside the instruction set.
    pub fn unimplemented_instruction(command: u8) -> Self {
        SimulationError {
            source: ErrorSource::Instruction(command)
        }
    }

    pub fn kind(&self) -> SimulationErrorKind {
        match self.source {
            ErrorSource::Instruction(_) => SimulationErrorKind::UnimplementedInstruction,
            ErrorSource::External(ref c) => c.kind,
            ErrorSource::Internal(kind) => kind
        }
    }

    /// The offending command byte, if this error was raised by the decoder.
    pub fn code(&self) -> Option<u8> {
        match self.source {
            ErrorSource::Instruction(code) => Some(code),
            _ => None
        }
    }
}
impl From<SimulationErrorKind> for SimulationError {
    fn from(kind: SimulationErrorKind) -> Self {
        SimulationError {
            source: ErrorSource::Internal(kind)
        }
    }
}
impl Debug for SimulationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Debug::fmt(&self.source, f)
    }
}
impl Display for SimulationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.source {
            ErrorSource::Instruction(code) => write!(f, "{} (opcode {:04b}, command {:#04X})", SimulationErrorKind::UnimplementedInstruction.as_str(), code >> 4, code),
            ErrorSource::External(ref c) => Display::fmt(&c.error, f),
            ErrorSource::Internal(kind) => write!(f, "{}", kind.as_str())
        }
    }
}
impl Error for SimulationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self.source {
            ErrorSource::External(ref c) => c.error.source(),
            _ => None
        }
    }
}

#[cfg(test)]
mod test {
    use crate::error::{SimulationError, SimulationErrorKind};

    #[test]
    fn unimplemented_instruction_carries_code() {
        let error = SimulationError::unimplemented_instruction(0x4A);

        assert_eq!(error.kind(), SimulationErrorKind::UnimplementedInstruction);
        assert_eq!(error.code(), Some(0x4A));
        assert_eq!(error.to_string(), "unimplemented instruction (opcode 0100, command 0x4A)");
    }

    #[test]
    fn internal_kind_has_no_code() {
        let error = SimulationError::from(SimulationErrorKind::BusUnavailable);

        assert_eq!(error.kind(), SimulationErrorKind::BusUnavailable);
        assert_eq!(error.code(), None);
        assert_eq!(error.to_string(), "bus unavailable");
    }
}
