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

//! Store instructions. When the coprocessor-0 isolate-cache bit is set,
//! stores that target RAM are dropped at the CPU layer instead of reaching
//! the bus (`spec.md` §4.2) — DMA and GPU traffic are never subject to this
//! gate since it's enforced here, not inside [`Bus`].

use super::Fields;
use crate::core::cpu::Cpu;
use crate::core::error::{CpuException, Result};
use crate::core::memory::Bus;

impl Cpu {
    fn addr(&self, f: Fields) -> u32 {
        self.reg(f.rs).wrapping_add(f.imm16_se() as u32)
    }

    pub(super) fn sb(&mut self, f: Fields, bus: &mut Bus) -> Result<()> {
        let addr = self.addr(f);
        if self.isolate_cache_hits_ram(addr) {
            return Ok(());
        }
        bus.store8(addr, self.reg(f.rt) as u8)
    }

    pub(super) fn sh(&mut self, f: Fields, bus: &mut Bus) -> Result<()> {
        let addr = self.addr(f);
        if addr % 2 != 0 {
            self.raise(CpuException::StoreAddr { address: addr });
            return Ok(());
        }
        if self.isolate_cache_hits_ram(addr) {
            return Ok(());
        }
        bus.store16(addr, self.reg(f.rt) as u16)
    }

    pub(super) fn sw(&mut self, f: Fields, bus: &mut Bus) -> Result<()> {
        let addr = self.addr(f);
        if addr % 4 != 0 {
            self.raise(CpuException::StoreAddr { address: addr });
            return Ok(());
        }
        if self.isolate_cache_hits_ram(addr) {
            return Ok(());
        }
        bus.store32(addr, self.reg(f.rt))
    }

    /// `swl rt, offset(rs)` — store the most-significant bytes of `rt` into
    /// the low-order bytes of the aligned word containing `addr`.
    pub(super) fn swl(&mut self, f: Fields, bus: &mut Bus) -> Result<()> {
        let addr = self.addr(f);
        if self.isolate_cache_hits_ram(addr) {
            return Ok(());
        }
        let aligned = addr & !3;
        let word = bus.load32(aligned)?;
        let rt = self.reg(f.rt);
        let merged = match addr & 3 {
            0 => (word & 0xFFFF_FF00) | (rt >> 24),
            1 => (word & 0xFFFF_0000) | (rt >> 16),
            2 => (word & 0xFF00_0000) | (rt >> 8),
            _ => rt,
        };
        bus.store32(aligned, merged)
    }

    /// `swr rt, offset(rs)` — store the least-significant bytes of `rt` into
    /// the high-order bytes of the aligned word containing `addr`.
    pub(super) fn swr(&mut self, f: Fields, bus: &mut Bus) -> Result<()> {
        let addr = self.addr(f);
        if self.isolate_cache_hits_ram(addr) {
            return Ok(());
        }
        let aligned = addr & !3;
        let word = bus.load32(aligned)?;
        let rt = self.reg(f.rt);
        let merged = match addr & 3 {
            0 => rt,
            1 => (word & 0x0000_00FF) | (rt << 8),
            2 => (word & 0x0000_FFFF) | (rt << 16),
            _ => (word & 0x00FF_FFFF) | (rt << 24),
        };
        bus.store32(aligned, merged)
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::fields as f;
    use crate::core::cpu::Cpu;
    use crate::core::cpu::cop0::Cop0Reg;
    use crate::core::gpu::GpuChannel;
    use crate::core::memory::Bus;
    use std::sync::Arc;

    fn bus() -> Bus {
        Bus::new(vec![0u8; 512 * 1024], Arc::new(GpuChannel::new())).unwrap()
    }

    #[test]
    fn sw_then_lw_round_trips() {
        let mut cpu = Cpu::new();
        let mut b = bus();
        cpu.out_gpr[1] = 0xCAFE_BABE;
        cpu.commit();
        cpu.sw(f(0x2B, 0, 1, 0, 0, 0x0010), &mut b).unwrap();
        assert_eq!(b.load32(0x10).unwrap(), 0xCAFE_BABE);
    }

    #[test]
    fn sw_misaligned_raises_exception() {
        let mut cpu = Cpu::new();
        let mut b = bus();
        cpu.sw(f(0x2B, 0, 1, 0, 0, 0x0001), &mut b).unwrap();
        assert_ne!(cpu.cop0().cause, 0);
    }

    #[test]
    fn isolate_cache_drops_ram_stores() {
        let mut cpu = Cpu::new();
        let mut b = bus();
        cpu.cop0.write(Cop0Reg::Sr, 1 << 16);
        cpu.out_gpr[1] = 0x1234_5678;
        cpu.commit();
        cpu.sw(f(0x2B, 0, 1, 0, 0, 0x0010), &mut b).unwrap();
        assert_eq!(b.load32(0x10).unwrap(), 0);
    }

    #[test]
    fn swl_merges_into_low_bytes_of_aligned_word() {
        let mut cpu = Cpu::new();
        let mut b = bus();
        b.store32(0, 0x1122_3344).unwrap();
        cpu.out_gpr[1] = 0xAABB_CCDD;
        cpu.commit();
        cpu.swl(f(0x2A, 0, 1, 0, 0, 0), &mut b).unwrap();
        assert_eq!(b.load32(0).unwrap(), (0x1122_3344 & 0xFFFF_FF00) | 0xAA);
    }
}
