use rand::Rng;

use tt8_sim::Signal;
use tt8_sim::bus::Bus;
use tt8_sim::chip::Chip;
use tt8_sim::clock::Clock;
use tt8_sim::processor::Processor;
use tt8_sim::processor::alu::AluOp;
use tt8_sim::processor::decoder::{Instruction, Register};

fn r(n: u8) -> Register {
    Register::from_nibble(n)
}

fn run(cpu: &mut Processor, instruction: Instruction) {
    let (command, data) = instruction.encode();
    cpu.step(command, data).unwrap();
}

#[tokio::test]
async fn load_and_store_through_ports() {
    let mut chip = Chip::new();
    let ui_in = chip.ui_in().socket();
    let uio_in = chip.uio_in().socket();
    let uo_out = chip.uo_out().socket();

    chip.reset(5).await.unwrap();

    ui_in.write(0b0001_0011).await;
    uio_in.write(123).await;
    chip.clock().await.unwrap();
    chip.clock().await.unwrap();
    let w = chip.processor().write_back();
    assert!(w.write);
    assert_eq!(w.w_reg, r(3));
    assert_eq!(w.w_data, 123);
    assert_eq!(chip.processor().register(r(3)), 123);

    ui_in.write(0b0010_0011).await;
    chip.clock().await.unwrap();
    chip.clock().await.unwrap();
    assert_eq!(uo_out.read().await, 123);
}

#[test]
fn xor_scenario() {
    let mut cpu = Processor::new();
    cpu.reset().unwrap();

    run(&mut cpu, Instruction::Ldb { dst: r(1), imm: 0xAA });
    run(&mut cpu, Instruction::Ldb { dst: r(2), imm: 0x55 });
    run(&mut cpu, Instruction::Alu { op: AluOp::Xor, dst: r(3), src1: r(2), src2: r(1) });
    assert_eq!(cpu.register(r(3)), 0xFF);

    run(&mut cpu, Instruction::Stb { src: r(3) });
    assert_eq!(cpu.output(), 0xFF);
}

#[test]
fn inc_wraparound_scenario() {
    let mut cpu = Processor::new();
    cpu.reset().unwrap();

    run(&mut cpu, Instruction::Ldb { dst: r(3), imm: 255 });
    run(&mut cpu, Instruction::Inc { dst: r(3), src: r(3) });
    assert!(cpu.pending_carry());
    assert!(!cpu.flag());

    run(&mut cpu, Instruction::Stb { src: r(3) });
    assert_eq!(cpu.register(r(3)), 0);
    assert!(cpu.flag());

    run(&mut cpu, Instruction::Rds);
    assert_eq!(cpu.output(), 1);
}

#[test]
fn every_register_holds_every_value() {
    let mut cpu = Processor::new();
    cpu.reset().unwrap();

    for register in Register::all() {
        for value in 0..=255u8 {
            run(&mut cpu, Instruction::Ldb { dst: register, imm: value });
            assert_eq!(cpu.register(register), value);
            run(&mut cpu, Instruction::Stb { src: register });
            assert_eq!(cpu.output(), value);
        }
    }
}

#[test]
fn store_does_not_mutate_registers() {
    let mut rng = rand::thread_rng();
    let mut cpu = Processor::new();
    cpu.reset().unwrap();

    for register in Register::all() {
        run(&mut cpu, Instruction::Ldb { dst: register, imm: rng.gen() });
    }
    let before = *cpu.registers();

    for register in Register::all() {
        run(&mut cpu, Instruction::Stb { src: register });
        run(&mut cpu, Instruction::Stb { src: register });
        assert_eq!(cpu.output(), before[register.index()]);
    }
    assert_eq!(*cpu.registers(), before);
}

#[test]
fn random_alu_programs_match_reference() {
    let ops = [AluOp::And, AluOp::Or, AluOp::Add, AluOp::Sub, AluOp::Xor, AluOp::Inc];
    let mut rng = rand::thread_rng();
    let mut cpu = Processor::new();
    let mut model = [0u8; 16];
    cpu.reset().unwrap();

    for register in Register::all() {
        let value = rng.gen();
        model[register.index()] = value;
        run(&mut cpu, Instruction::Ldb { dst: register, imm: value });
    }

    let mut last_carry = None;
    for _ in 0..2000 {
        let op = ops[rng.gen_range(0..ops.len())];
        let dst = r(rng.gen_range(0..16));
        let src1 = r(rng.gen_range(0..16));
        let src2 = r(rng.gen_range(0..16));
        let in1 = model[src1.index()];
        let in2 = model[src2.index()];

        let (expected, carry) = match op {
            AluOp::And => (in1 & in2, None),
            AluOp::Or => (in1 | in2, None),
            AluOp::Xor => (in1 ^ in2, None),
            AluOp::Add => (in1.wrapping_add(in2), Some(in1 as u16 + in2 as u16 > 255)),
            AluOp::Sub => (in1.wrapping_sub(in2), Some(in1 < in2)),
            AluOp::Inc => (in1.wrapping_add(1), Some(in1 == 255))
        };
        let instruction = if op == AluOp::Inc {
            Instruction::Inc { dst, src: src1 }
        } else {
            Instruction::Alu { op, dst, src1, src2 }
        };

        let committed_before = cpu.flag();
        run(&mut cpu, instruction);
        model[dst.index()] = expected;

        assert_eq!(cpu.register(dst), expected, "{}", instruction);
        assert_eq!(cpu.pending_carry(), carry.unwrap_or(false), "{}", instruction);
        match last_carry {
            Some(c) => assert_eq!(cpu.flag(), c, "{}", instruction),
            None => assert_eq!(cpu.flag(), committed_before, "{}", instruction)
        }
        last_carry = carry;
    }
}

#[test]
fn reset_mid_program() {
    let mut cpu = Processor::new();
    cpu.reset().unwrap();

    run(&mut cpu, Instruction::Ldb { dst: r(0), imm: 255 });
    run(&mut cpu, Instruction::Inc { dst: r(0), src: r(0) });
    assert!(cpu.pending_carry());

    cpu.set_reset(Signal::Low);
    cpu.cycle().unwrap();
    cpu.set_reset(Signal::High);
    assert!(!cpu.pending_carry());

    run(&mut cpu, Instruction::Rds);
    assert!(!cpu.flag());
    assert_eq!(cpu.output(), 0);
}
