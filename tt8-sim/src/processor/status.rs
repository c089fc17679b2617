/// Position of the carry in its two-stage path towards the status flag.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum CarryStage {
    /// Reset state: flag cleared, nothing in flight.
    Clear,
    /// A carry was latched on the last edge and commits on the next one.
    Pending { carry: bool },
    /// The pending slot has been emptied into the flag.
    Committed
}

/// The one-bit status register and the pending-carry slot in front of it.
pub struct StatusFlag {
    stage: CarryStage,
    flag: bool
}
impl StatusFlag {
    pub fn new() -> Self {
        StatusFlag {
            stage: CarryStage::Clear,
            flag: false
        }
    }

    /// Advances the pipeline by one rising edge.
    ///
    /// `carry` is the ALU carry-out of this cycle if the executing opcode is arithmetic, `None`
    /// otherwise. Whatever was pending before the edge is committed first.
    pub fn clock(&mut self, carry: Option<bool>) {
        if let CarryStage::Pending { carry } = self.stage {
            self.flag = carry;
        }
        self.stage = match (carry, self.stage) {
            (Some(carry), _) => CarryStage::Pending { carry },
            (None, CarryStage::Pending { .. }) => CarryStage::Committed,
            (None, stage) => stage
        };
    }

    /// The committed flag, as forwarded by `RDS`.
    pub fn flag(&self) -> bool {
        self.flag
    }

    pub fn pending(&self) -> Option<bool> {
        match self.stage {
            CarryStage::Pending { carry } => Some(carry),
            _ => None
        }
    }

    /// The pending-carry line: the latched carry, or low when the slot is empty.
    pub fn pending_carry(&self) -> bool {
        self.pending().unwrap_or(false)
    }

    pub fn stage(&self) -> CarryStage {
        self.stage
    }

    pub fn reset(&mut self) {
        self.stage = CarryStage::Clear;
        self.flag = false;
    }
}
impl Default for StatusFlag {
    fn default() -> Self {
        StatusFlag::new()
    }
}
