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

//! The emulator driver: wires [`Cpu`] and [`Bus`] together and runs the
//! interpreter loop until an external shutdown signal is raised
//! (`spec.md` §4.7/§5).
//!
//! The Memory Bus and all mutable device state are private to the thread
//! that calls [`Machine::run`]; the [`GpuChannel`] hand-off is the only
//! synchronization boundary, and `shutdown` is the only other
//! cross-thread signal.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::core::cpu::Cpu;
use crate::core::error::Result;
use crate::core::gpu::GpuChannel;
use crate::core::memory::Bus;

/// Owns the CPU and bus and drives the fetch/execute loop.
pub struct Machine {
    cpu: Cpu,
    bus: Bus,
    shutdown: Arc<AtomicBool>,
}

impl Machine {
    /// Build a machine with `bios` loaded into the BIOS ROM. `shutdown` is
    /// shared with the presentation side, which sets it to request a stop.
    pub fn new(bios: Vec<u8>, shutdown: Arc<AtomicBool>) -> Result<(Self, Arc<GpuChannel>)> {
        let sink = Arc::new(GpuChannel::new());
        let bus = Bus::new(bios, sink.clone())?;
        Ok((
            Self {
                cpu: Cpu::new(),
                bus,
                shutdown,
            },
            sink,
        ))
    }

    /// Direct RAM access for a host-supplied executable loader, bypassing
    /// the CPU's load/store path (`spec.md` §6's note that BIOS/program
    /// acquisition is external).
    pub fn ram_mut(&mut self) -> &mut [u8] {
        self.bus.ram_mut()
    }

    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    /// Run until `shutdown` is observed set. Checked between steps, not
    /// inside one, so a single instruction is never interrupted
    /// mid-execution.
    pub fn run(&mut self) -> Result<()> {
        while !self.shutdown.load(Ordering::SeqCst) {
            self.cpu.step(&mut self.bus)?;
        }
        log::info!("emulator thread observed shutdown, stopping");
        Ok(())
    }

    /// Run at most `steps` instructions, stopping early on shutdown.
    /// Exposed for tests and tools that need bounded execution.
    pub fn run_for(&mut self, steps: u64) -> Result<()> {
        for _ in 0..steps {
            if self.shutdown.load(Ordering::SeqCst) {
                break;
            }
            self.cpu.step(&mut self.bus)?;
        }
        Ok(())
    }
}
