use tt8_sim::processor::decoder::{Instruction, Register};
use tt8_sim::processor::register_file::REGISTER_COUNT;

use crate::error::{CheckError, CheckErrorKind, CheckResult};
use crate::runner::Runner;

/// Register contents written by one self-test pass.
pub type Pattern = [u8; REGISTER_COUNT];

/// On-chip self-test: every check goes through the ports only.
pub struct SelfTest {
    runner: Runner
}
impl SelfTest {
    pub async fn start() -> CheckResult<Self> {
        let mut runner = Runner::new();
        runner.power_on().await?;
        Ok(SelfTest { runner })
    }

    pub fn runner(&self) -> &Runner {
        &self.runner
    }

    async fn execute(&mut self, instruction: Instruction) -> CheckResult<u8> {
        let (command, data) = instruction.encode();
        self.runner.drive(command, data).await?;
        Ok(self.runner.chip().peek_output()?)
    }

    pub async fn load(&mut self, register: Register, value: u8) -> CheckResult<()> {
        self.execute(Instruction::Ldb { dst: register, imm: value }).await?;
        Ok(())
    }

    /// Reads `register` back through `STB` and compares it against `expected`.
    pub async fn verify(&mut self, register: Register, expected: u8) -> CheckResult<()> {
        let found = self.execute(Instruction::Stb { src: register }).await?;
        if found != expected {
            return Err(CheckError::mismatch(register, expected, found));
        }
        Ok(())
    }

    pub async fn load_pattern(&mut self, pattern: &Pattern) -> CheckResult<()> {
        for register in Register::all() {
            self.load(register, pattern[register.index()]).await?;
        }
        Ok(())
    }

    pub async fn verify_pattern(&mut self, pattern: &Pattern) -> CheckResult<()> {
        for register in Register::all() {
            self.verify(register, pattern[register.index()]).await?;
        }
        Ok(())
    }

    /// `INC` of 255 must wrap to 0 with the carry pending after one edge and committed after two.
    pub async fn check_carry_timing(&mut self, register: Register) -> CheckResult<()> {
        let inc = Instruction::Inc { dst: register, src: register };

        // clear the flag first: a carry-free INC commits 0 on the following edge
        self.load(register, 0).await?;
        self.execute(inc).await?;
        self.load(register, 0xFF).await?;
        if self.runner.chip().processor().flag() {
            return Err(CheckErrorKind::CarryTiming.into());
        }

        self.execute(inc).await?;
        let processor = self.runner.chip().processor();
        if !processor.pending_carry() || processor.flag() {
            return Err(CheckErrorKind::CarryTiming.into());
        }

        self.verify(register, 0).await?;
        let flag = self.execute(Instruction::Rds).await?;
        if flag != 1 {
            return Err(CheckErrorKind::CarryTiming.into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use rand::Rng;
    use tt8_sim::processor::decoder::Register;

    use crate::selftest::{Pattern, SelfTest};

    #[tokio::test]
    async fn random_patterns_pass() {
        let mut rng = rand::thread_rng();
        let mut test = SelfTest::start().await.unwrap();

        for _ in 0..8 {
            let pattern: Pattern = rng.gen();
            test.load_pattern(&pattern).await.unwrap();
            test.verify_pattern(&pattern).await.unwrap();
        }
        for register in Register::all() {
            test.check_carry_timing(register).await.unwrap();
        }
    }

    #[tokio::test]
    async fn wrong_expectation_is_reported() {
        let mut test = SelfTest::start().await.unwrap();
        let r9 = Register::from_nibble(9);

        test.load(r9, 0x5A).await.unwrap();
        let error = test.verify(r9, 0xA5).await.unwrap_err();
        assert_eq!(error.register(), Some(r9));
    }
}
