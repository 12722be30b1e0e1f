// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! MIPS R3000A fetch/decode/execute interpreter.
//!
//! The register file is doubled (`gpr` / `out_gpr`) to reproduce the load
//! delay slot, and a `branch_taken`/`in_delay_slot` pair tracks the branch
//! delay slot, per `spec.md` §4.5 and §9.

pub mod cop0;
mod decode;
mod instructions;

pub use cop0::{Cop0, Cop0Reg};
pub use decode::Fields;

use crate::core::error::{CpuException, Result};
use crate::core::memory::{physical, region, Bus, Region};

#[cfg(test)]
mod tests;

const RESET_PC: u32 = 0xBFC0_0000;

/// A load whose result becomes visible to the register file one step after
/// the load instruction itself (`spec.md` §4.5/§9).
#[derive(Debug, Clone, Copy)]
struct PendingLoad {
    reg: u8,
    value: u32,
}

/// The R3000A interpreter. Holds no reference to [`Bus`]; one is borrowed
/// for the duration of each [`Cpu::step`].
pub struct Cpu {
    gpr: [u32; 32],
    out_gpr: [u32; 32],
    pc: u32,
    next_pc: u32,
    current_pc: u32,
    hi: u32,
    lo: u32,
    cop0: Cop0,
    pending_load: Option<PendingLoad>,
    branch_taken: bool,
    in_delay_slot: bool,
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu {
    pub fn new() -> Self {
        Self {
            gpr: [0; 32],
            out_gpr: [0; 32],
            pc: RESET_PC,
            next_pc: RESET_PC.wrapping_add(4),
            current_pc: RESET_PC,
            hi: 0,
            lo: 0,
            cop0: Cop0::new(),
            pending_load: None,
            branch_taken: false,
            in_delay_slot: false,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    #[inline(always)]
    pub fn pc(&self) -> u32 {
        self.pc
    }

    #[inline(always)]
    pub fn next_pc(&self) -> u32 {
        self.next_pc
    }

    #[inline(always)]
    pub fn reg(&self, index: u8) -> u32 {
        self.gpr[index as usize]
    }

    #[inline(always)]
    fn set_reg(&mut self, index: u8, value: u32) {
        if index != 0 {
            self.out_gpr[index as usize] = value;
        }
    }

    /// Schedule `value` to land in `reg` at the *next* step's commit,
    /// reproducing the load delay slot. Overwrites (rather than stacks) any
    /// still-pending load, matching real hardware: only the most recent
    /// load instruction's delay is honored.
    fn set_reg_delayed(&mut self, reg: u8, value: u32) {
        self.pending_load = Some(PendingLoad { reg, value });
    }

    pub fn hi(&self) -> u32 {
        self.hi
    }

    pub fn lo(&self) -> u32 {
        self.lo
    }

    pub fn cop0(&self) -> &Cop0 {
        &self.cop0
    }

    /// Fetch, decode, and execute exactly one instruction.
    pub fn step(&mut self, bus: &mut Bus) -> Result<()> {
        self.current_pc = self.pc;
        self.out_gpr = self.gpr;

        if self.current_pc % 4 != 0 {
            self.raise(CpuException::LoadAddr { address: self.current_pc });
            self.commit();
            return Ok(());
        }

        let raw = bus.load32(self.current_pc)?;

        self.pc = self.next_pc;
        self.next_pc = self.next_pc.wrapping_add(4);

        if let Some(load) = self.pending_load.take() {
            self.set_reg(load.reg, load.value);
        }

        self.in_delay_slot = self.branch_taken;
        self.branch_taken = false;

        self.execute(Fields::decode(raw), bus)?;

        self.commit();
        Ok(())
    }

    fn commit(&mut self) {
        self.out_gpr[0] = 0;
        self.gpr = self.out_gpr;
    }

    /// Unconditional jump/branch helper: sets `next_pc` to `target` and
    /// marks the following instruction as executing in the delay slot.
    fn branch_to(&mut self, target: u32) {
        self.next_pc = target;
        self.branch_taken = true;
    }

    /// Route an architectural exception through the coprocessor-0 entry
    /// sequence (`spec.md` §4.5).
    fn raise(&mut self, exception: CpuException) {
        let mut epc = self.current_pc;
        let mut cause = exception.excode() << 2;
        if self.in_delay_slot {
            epc = epc.wrapping_sub(4);
            cause |= 1 << 31;
        }
        self.cop0.enter_exception();
        self.cop0.cause = cause;
        self.cop0.epc = epc;

        let target = self.cop0.exception_vector();
        self.pc = target;
        self.next_pc = target.wrapping_add(4);
        log::debug!("CPU exception {exception:?} at pc={:#010x} -> vector {target:#010x}", self.current_pc);
    }

    /// Whether `vaddr` (after segmentation) lands in RAM — the only region
    /// the isolate-cache gate affects (§4.2).
    fn isolate_cache_hits_ram(&self, vaddr: u32) -> bool {
        self.cop0.isolate_cache()
            && region::find(physical(vaddr)).map(|r| r.region == Region::Ram).unwrap_or(false)
    }
}
