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

//! Add/subtract/compare instructions (`spec.md` §4.5/§8).

use super::Fields;
use crate::core::cpu::Cpu;
use crate::core::error::{CpuException, Result};

impl Cpu {
    /// `add rd, rs, rt` — traps on signed overflow.
    pub(super) fn add(&mut self, f: Fields) -> Result<()> {
        let rs = self.reg(f.rs) as i32;
        let rt = self.reg(f.rt) as i32;
        match rs.checked_add(rt) {
            Some(v) => {
                self.set_reg(f.rd, v as u32);
                Ok(())
            }
            None => {
                self.raise(CpuException::Overflow);
                Ok(())
            }
        }
    }

    /// `addu rd, rs, rt` — wrapping, never traps.
    pub(super) fn addu(&mut self, f: Fields) {
        let v = self.reg(f.rs).wrapping_add(self.reg(f.rt));
        self.set_reg(f.rd, v);
    }

    /// `addi rt, rs, imm` — traps on signed overflow.
    pub(super) fn addi(&mut self, f: Fields) -> Result<()> {
        let rs = self.reg(f.rs) as i32;
        match rs.checked_add(f.imm16_se()) {
            Some(v) => {
                self.set_reg(f.rt, v as u32);
                Ok(())
            }
            None => {
                self.raise(CpuException::Overflow);
                Ok(())
            }
        }
    }

    /// `addiu rt, rs, imm` — wrapping, never traps.
    pub(super) fn addiu(&mut self, f: Fields) {
        let v = (self.reg(f.rs) as i32).wrapping_add(f.imm16_se()) as u32;
        self.set_reg(f.rt, v);
    }

    /// `sub rd, rs, rt` — traps on signed overflow.
    pub(super) fn sub(&mut self, f: Fields) -> Result<()> {
        let rs = self.reg(f.rs) as i32;
        let rt = self.reg(f.rt) as i32;
        match rs.checked_sub(rt) {
            Some(v) => {
                self.set_reg(f.rd, v as u32);
                Ok(())
            }
            None => {
                self.raise(CpuException::Overflow);
                Ok(())
            }
        }
    }

    /// `subu rd, rs, rt` — wrapping, never traps.
    pub(super) fn subu(&mut self, f: Fields) {
        let v = self.reg(f.rs).wrapping_sub(self.reg(f.rt));
        self.set_reg(f.rd, v);
    }

    /// `slt rd, rs, rt` — signed less-than.
    pub(super) fn slt(&mut self, f: Fields) {
        let v = (self.reg(f.rs) as i32) < (self.reg(f.rt) as i32);
        self.set_reg(f.rd, v as u32);
    }

    /// `sltu rd, rs, rt` — unsigned less-than.
    pub(super) fn sltu(&mut self, f: Fields) {
        let v = self.reg(f.rs) < self.reg(f.rt);
        self.set_reg(f.rd, v as u32);
    }

    /// `slti rt, rs, imm` — signed less-than against a sign-extended immediate.
    pub(super) fn slti(&mut self, f: Fields) {
        let v = (self.reg(f.rs) as i32) < f.imm16_se();
        self.set_reg(f.rt, v as u32);
    }

    /// `sltiu rt, rs, imm` — unsigned less-than against a sign-extended
    /// (then reinterpreted unsigned) immediate, per MIPS-I convention.
    pub(super) fn sltiu(&mut self, f: Fields) {
        let v = self.reg(f.rs) < (f.imm16_se() as u32);
        self.set_reg(f.rt, v as u32);
    }
}
