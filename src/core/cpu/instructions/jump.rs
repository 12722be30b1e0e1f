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

//! Unconditional jumps, also delay-slotted.

use super::Fields;
use crate::core::cpu::Cpu;

impl Cpu {
    /// `j target` — absolute jump within the current 256 MiB segment.
    pub(super) fn j(&mut self, f: Fields) {
        let t = (self.pc & 0xF000_0000) | (f.jump_target << 2);
        self.branch_to(t);
    }

    /// `jal target` — as [`Cpu::j`], linking `$ra`.
    pub(super) fn jal(&mut self, f: Fields) {
        let link = self.next_pc;
        self.set_reg(31, link);
        let t = (self.pc & 0xF000_0000) | (f.jump_target << 2);
        self.branch_to(t);
    }

    /// `jr rs`.
    pub(super) fn jr(&mut self, f: Fields) {
        let t = self.reg(f.rs);
        self.branch_to(t);
    }

    /// `jalr rd, rs` — links `rd` (not necessarily `$ra`).
    pub(super) fn jalr(&mut self, f: Fields) {
        let link = self.next_pc;
        let t = self.reg(f.rs);
        self.set_reg(f.rd, link);
        self.branch_to(t);
    }
}
