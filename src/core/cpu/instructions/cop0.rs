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

//! Coprocessor-0 instructions: `mfc0`, `mtc0`, `rfe`.

use super::Fields;
use crate::core::cpu::cop0::Cop0Reg;
use crate::core::cpu::Cpu;

impl Cpu {
    pub(super) fn execute_cop0(&mut self, f: Fields) {
        match f.rs {
            0x00 => self.mfc0(f),
            0x04 => self.mtc0(f),
            0x10 if f.funct == 0x10 => self.rfe(),
            _ => log::warn!("COP0: unhandled rs field {:#04x}", f.rs),
        }
    }

    /// `mfc0 rt, <reg>` — like any load, visible one step late.
    fn mfc0(&mut self, f: Fields) {
        let v = self.cop0.read(Cop0Reg::from_index(f.rd));
        self.set_reg_delayed(f.rt, v);
    }

    fn mtc0(&mut self, f: Fields) {
        let v = self.reg(f.rt);
        self.cop0.write(Cop0Reg::from_index(f.rd), v);
    }

    fn rfe(&mut self) {
        self.cop0.rfe();
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::fields as f;
    use crate::core::cpu::cop0::Cop0Reg;
    use crate::core::cpu::Cpu;

    #[test]
    fn mtc0_then_mfc0_round_trips_through_the_delay_slot() {
        let mut cpu = Cpu::new();
        cpu.out_gpr[1] = 0x1234;
        cpu.commit();
        cpu.mtc0(f(0x10, 0, 1, Cop0Reg::Sr as u8, 0x04, 0));
        assert_eq!(cpu.cop0().sr, 0x1234);

        cpu.execute_cop0(f(0x10, 0, 2, Cop0Reg::Sr as u8, 0, 0));
        assert_eq!(cpu.reg(2), 0, "mfc0 result not yet visible");
        let pending = cpu.pending_load.expect("mfc0 schedules a delayed load");
        assert_eq!(pending.value, 0x1234);
    }

    #[test]
    fn rfe_pops_the_mode_stack() {
        let mut cpu = Cpu::new();
        cpu.cop0.sr = 0b10_01_11;
        cpu.execute_cop0(f(0x10, 0x10, 0, 0, 0x10, 0));
        assert_eq!(cpu.cop0().sr & 0x3F, 0b101001);
    }
}
