pub mod clock;
pub mod error;

pub mod processor;
pub mod bus;
pub mod chip;

/// Level of a single-bit line, such as the active-low reset.
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug)]
pub enum Signal {
    Low,
    High
}
impl Signal {
    pub fn is_low(&self) -> bool {
        *self == Signal::Low
    }
}
