//! `Cpu::step` integration tests: the fetch/decode/execute loop itself,
//! exercising the load-delay and branch-delay slots end to end rather than
//! through the per-instruction unit tests in `instructions/*.rs`.

use super::*;
use crate::core::gpu::GpuChannel;
use crate::core::memory::Bus;
use std::sync::Arc;

fn bus_with_program(words: &[u32]) -> Bus {
    let mut bios = vec![0u8; 512 * 1024];
    for (i, w) in words.iter().enumerate() {
        bios[i * 4..i * 4 + 4].copy_from_slice(&w.to_le_bytes());
    }
    Bus::new(bios, Arc::new(GpuChannel::new())).unwrap()
}

fn r_type(op: u32, rs: u8, rt: u8, rd: u8, shamt: u8, funct: u32) -> u32 {
    (op << 26) | ((rs as u32) << 21) | ((rt as u32) << 16) | ((rd as u32) << 11) | ((shamt as u32) << 6) | funct
}

fn i_type(op: u32, rs: u8, rt: u8, imm: u16) -> u32 {
    (op << 26) | ((rs as u32) << 21) | ((rt as u32) << 16) | imm as u32
}

#[test]
fn boot_fetch_scenario() {
    // spec.md §8 end-to-end scenario 1: LUI r8, 0x0013 as the first BIOS word.
    let mut bus = bus_with_program(&[0x3C08_0013]);
    let mut cpu = Cpu::new();
    cpu.step(&mut bus).unwrap();
    assert_eq!(cpu.pc(), 0xBFC0_0004);
    assert_eq!(cpu.next_pc(), 0xBFC0_0008);
    assert_eq!(cpu.reg(8), 0x0013_0000);
}

#[test]
fn load_delay_slot_reads_the_stale_value() {
    // lw r2, 0(r1); add r3, r2, r0 -- r3 must see r2's *previous* value.
    let lw = i_type(0x23, 1, 2, 0);
    let add = r_type(0x00, 2, 0, 3, 0, 0x20);
    let mut bus = bus_with_program(&[lw, add]);
    bus.store32(0x10, 0xDEAD_BEEF).unwrap();

    let mut cpu = Cpu::new();
    // r1 = 0x10 (the load address), r2 starts at a known sentinel.
    cpu.out_gpr[1] = 0x10;
    cpu.out_gpr[2] = 0x1111_1111;
    cpu.commit();

    cpu.step(&mut bus).unwrap(); // executes `lw`, schedules r2 for next step
    cpu.step(&mut bus).unwrap(); // executes `add`; r2's load lands *before* this decode

    assert_eq!(cpu.reg(2), 0xDEAD_BEEF, "the pending load has landed by now");
    assert_eq!(cpu.reg(3), 0x1111_1111, "but `add` read the stale r2");
}

#[test]
fn branch_delay_slot_executes_before_the_jump_lands() {
    // j <forward>; addiu r1, r0, 1 (delay slot, always executes);
    // addiu r2, r0, 2 (skipped by the jump).
    let target_word_index = 3u32;
    let target_addr = 0xBFC0_0000u32 + target_word_index * 4;
    let j = (0x02u32 << 26) | ((target_addr >> 2) & 0x03FF_FFFF);
    let addiu_r1 = i_type(0x09, 0, 1, 1);
    let addiu_r2 = i_type(0x09, 0, 2, 2);
    let addiu_r3 = i_type(0x09, 0, 3, 3);
    let mut bus = bus_with_program(&[j, addiu_r1, addiu_r2, addiu_r3]);

    let mut cpu = Cpu::new();
    cpu.step(&mut bus).unwrap(); // j (delay slot not yet executed)
    assert_eq!(cpu.reg(1), 0, "delay slot hasn't executed yet");
    cpu.step(&mut bus).unwrap(); // delay slot: addiu r1, r0, 1
    assert_eq!(cpu.reg(1), 1);
    assert_eq!(cpu.pc(), 0xBFC0_0000 + target_word_index * 4, "jump landed after the delay slot");
    cpu.step(&mut bus).unwrap(); // addiu r3, r0, 3 at the jump target
    assert_eq!(cpu.reg(2), 0, "the instruction the jump skipped never ran");
    assert_eq!(cpu.reg(3), 3);
}

#[test]
fn exception_in_a_delay_slot_backs_epc_up_and_sets_cause_bit31() {
    // j <self>; syscall (delay slot) -- the syscall raised while still in
    // the delay slot should report epc = (delay slot pc) - 4 with cause[31] set.
    let j = 0x02u32 << 26; // j 0 (target 0xBFC00000, irrelevant here)
    let syscall = r_type(0x00, 0, 0, 0, 0, 0x0C);
    let mut bus = bus_with_program(&[j, syscall]);

    let mut cpu = Cpu::new();
    cpu.step(&mut bus).unwrap(); // j
    let delay_slot_pc = cpu.pc();
    cpu.step(&mut bus).unwrap(); // syscall, executing in the delay slot

    assert_eq!(cpu.cop0().epc, delay_slot_pc.wrapping_sub(4));
    assert_ne!(cpu.cop0().cause & (1 << 31), 0);
}

#[test]
fn register_zero_always_reads_zero_after_commit() {
    // addiu r0, r0, 5 -- writes to r0 are discarded at commit (Testable
    // Property 1).
    let addiu_r0 = i_type(0x09, 0, 0, 5);
    let mut bus = bus_with_program(&[addiu_r0]);
    let mut cpu = Cpu::new();
    cpu.step(&mut bus).unwrap();
    assert_eq!(cpu.reg(0), 0);
}

#[test]
fn misaligned_fetch_raises_load_addr_without_fetching() {
    let mut bus = bus_with_program(&[0; 4]);
    let mut cpu = Cpu::new();
    // Force an odd-aligned pc directly; `step` must catch this before the fetch.
    cpu.pc = 0xBFC0_0001;
    cpu.next_pc = 0xBFC0_0005;
    cpu.step(&mut bus).unwrap();
    assert_ne!(cpu.cop0().cause, 0);
    assert_eq!(cpu.cop0().epc, 0xBFC0_0001);
}
