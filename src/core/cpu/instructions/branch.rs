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

//! Conditional branches. Every branch here has a delay slot: the target
//! only takes effect for the instruction fetched *after* the one right
//! after the branch (`spec.md` §4.5/§9).

use super::Fields;
use crate::core::cpu::Cpu;

impl Cpu {
    /// Branch target: `self.pc` already holds the delay slot's address by
    /// the time an instruction executes, so it's the correct base.
    fn target(&self, f: Fields) -> u32 {
        self.pc.wrapping_add((f.imm16_se() << 2) as u32)
    }

    pub(super) fn beq(&mut self, f: Fields) {
        if self.reg(f.rs) == self.reg(f.rt) {
            let t = self.target(f);
            self.branch_to(t);
        }
    }

    pub(super) fn bne(&mut self, f: Fields) {
        if self.reg(f.rs) != self.reg(f.rt) {
            let t = self.target(f);
            self.branch_to(t);
        }
    }

    pub(super) fn blez(&mut self, f: Fields) {
        if (self.reg(f.rs) as i32) <= 0 {
            let t = self.target(f);
            self.branch_to(t);
        }
    }

    pub(super) fn bgtz(&mut self, f: Fields) {
        if (self.reg(f.rs) as i32) > 0 {
            let t = self.target(f);
            self.branch_to(t);
        }
    }

    pub(super) fn bltz(&mut self, f: Fields) {
        if (self.reg(f.rs) as i32) < 0 {
            let t = self.target(f);
            self.branch_to(t);
        }
    }

    pub(super) fn bgez(&mut self, f: Fields) {
        if (self.reg(f.rs) as i32) >= 0 {
            let t = self.target(f);
            self.branch_to(t);
        }
    }

    /// `bltzal` links `$ra` unconditionally, per MIPS-I, even when the
    /// branch itself isn't taken.
    pub(super) fn bltzal(&mut self, f: Fields) {
        let link = self.next_pc;
        self.set_reg(31, link);
        if (self.reg(f.rs) as i32) < 0 {
            let t = self.target(f);
            self.branch_to(t);
        }
    }

    pub(super) fn bgezal(&mut self, f: Fields) {
        let link = self.next_pc;
        self.set_reg(31, link);
        if (self.reg(f.rs) as i32) >= 0 {
            let t = self.target(f);
            self.branch_to(t);
        }
    }
}
