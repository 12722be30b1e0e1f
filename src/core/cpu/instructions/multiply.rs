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

//! `hi`/`lo` multiply, divide, and move instructions.
//!
//! Division by zero and the signed-overflow case (`i32::MIN / -1`) don't
//! trap on the R3000A; they produce the documented garbage results
//! (`spec.md` §8) instead of a CPU exception.

use super::Fields;
use crate::core::cpu::Cpu;

impl Cpu {
    pub(super) fn mult(&mut self, f: Fields) {
        let a = self.reg(f.rs) as i32 as i64;
        let b = self.reg(f.rt) as i32 as i64;
        let v = (a * b) as u64;
        self.hi = (v >> 32) as u32;
        self.lo = v as u32;
    }

    pub(super) fn multu(&mut self, f: Fields) {
        let a = self.reg(f.rs) as u64;
        let b = self.reg(f.rt) as u64;
        let v = a * b;
        self.hi = (v >> 32) as u32;
        self.lo = v as u32;
    }

    /// `div rs, rt` — signed. Division by zero and the `i32::MIN / -1`
    /// overflow case produce hardware-documented results rather than
    /// trapping.
    pub(super) fn div(&mut self, f: Fields) {
        let n = self.reg(f.rs) as i32;
        let d = self.reg(f.rt) as i32;
        if d == 0 {
            self.hi = n as u32;
            self.lo = if n >= 0 { 0xFFFF_FFFF } else { 1 };
        } else if n == i32::MIN && d == -1 {
            self.hi = 0;
            self.lo = i32::MIN as u32;
        } else {
            self.hi = (n % d) as u32;
            self.lo = (n / d) as u32;
        }
    }

    pub(super) fn divu(&mut self, f: Fields) {
        let n = self.reg(f.rs);
        let d = self.reg(f.rt);
        if d == 0 {
            self.hi = n;
            self.lo = 0xFFFF_FFFF;
        } else {
            self.hi = n % d;
            self.lo = n / d;
        }
    }

    pub(super) fn mfhi(&mut self, f: Fields) {
        self.set_reg(f.rd, self.hi);
    }

    pub(super) fn mthi(&mut self, f: Fields) {
        self.hi = self.reg(f.rs);
    }

    pub(super) fn mflo(&mut self, f: Fields) {
        self.set_reg(f.rd, self.lo);
    }

    pub(super) fn mtlo(&mut self, f: Fields) {
        self.lo = self.reg(f.rs);
    }
}
