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

//! DMA controller: seven channels, block and linked-list transfer engines.
//!
//! # Channels
//!
//! | # | Port    |
//! |---|---------|
//! | 0 | MDEC in |
//! | 1 | MDEC out|
//! | 2 | GPU     |
//! | 3 | CD-ROM  |
//! | 4 | SPU     |
//! | 5 | PIO     |
//! | 6 | OTC     |
//!
//! Only the GPU and OTC ports are implemented (`spec.md` §4.3); other ports
//! raise [`EmulatorError::Unimplemented`] if a guest program activates them.
//!
//! Register layout: each channel exposes `{0: base, 4: block_control,
//! 8: control}` at `0x1F801080 + 0x10*channel`; the controller-wide
//! registers live at major 7: `{0: control, 4: interrupt}`.

use crate::core::error::{EmulatorError, Result};
use crate::core::gpu::Gpu;

#[cfg(test)]
mod tests;

/// Transfer direction (`control` bit 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Device → RAM.
    ToRam,
    /// RAM → device.
    FromRam,
}

/// Address stepping direction (`control` bit 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Address increases by 4 each word.
    Increment,
    /// Address decreases by 4 each word.
    Decrement,
}

/// Synchronization mode (`control` bits 9-10).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sync {
    /// Transfer `block_size` words immediately, once.
    Manual,
    /// Transfer `block_size * block_count` words, split into device-paced
    /// blocks.
    Request,
    /// Follow a linked list of `{next, length}` headers in RAM.
    LinkedList,
}

/// The DMA port a channel is wired to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Port {
    MdecIn,
    MdecOut,
    Gpu,
    CdRom,
    Spu,
    Pio,
    Otc,
}

const PORTS: [Port; 7] = [
    Port::MdecIn,
    Port::MdecOut,
    Port::Gpu,
    Port::CdRom,
    Port::Spu,
    Port::Pio,
    Port::Otc,
];

// `control` bit layout.
const CTRL_DIRECTION: u32 = 1 << 0;
const CTRL_STEP: u32 = 1 << 1;
const CTRL_SYNC_SHIFT: u32 = 9;
const CTRL_SYNC_MASK: u32 = 0b11 << CTRL_SYNC_SHIFT;
const CTRL_ENABLE: u32 = 1 << 24;
const CTRL_TRIGGER: u32 = 1 << 28;

const BASE_MASK: u32 = 0x00FF_FFFF;
const RAM_ADDR_MASK: u32 = 0x001F_FFFC;

/// A single DMA channel's register file.
#[derive(Debug, Clone, Copy, Default)]
pub struct Channel {
    /// `MADR`: base RAM address, masked to 24 bits on write.
    base: u32,
    /// `BCR`: block size (low 16) and block count (high 16).
    block_control: u32,
    /// `CHCR`: packed control word, kept verbatim including unknown bits.
    control: u32,
}

impl Channel {
    fn direction(&self) -> Direction {
        if self.control & CTRL_DIRECTION != 0 {
            Direction::FromRam
        } else {
            Direction::ToRam
        }
    }

    fn step(&self) -> Step {
        if self.control & CTRL_STEP != 0 {
            Step::Decrement
        } else {
            Step::Increment
        }
    }

    fn sync(&self) -> Sync {
        match (self.control & CTRL_SYNC_MASK) >> CTRL_SYNC_SHIFT {
            0 => Sync::Manual,
            1 => Sync::Request,
            _ => Sync::LinkedList,
        }
    }

    fn enable(&self) -> bool {
        self.control & CTRL_ENABLE != 0
    }

    fn trigger(&self) -> bool {
        self.control & CTRL_TRIGGER != 0
    }

    fn block_size(&self) -> u32 {
        self.block_control & 0xFFFF
    }

    fn block_count(&self) -> u32 {
        (self.block_control >> 16) & 0xFFFF
    }

    /// `enable AND (sync != Manual OR trigger)`.
    pub fn active(&self) -> bool {
        self.enable() && (self.sync() != Sync::Manual || self.trigger())
    }

    /// Word count for block-mode transfers. `None` for linked-list mode,
    /// where the size is discovered by walking headers.
    fn transfer_size(&self) -> Option<u32> {
        match self.sync() {
            Sync::Manual => Some(self.block_size()),
            Sync::Request => Some(self.block_size().wrapping_mul(self.block_count())),
            Sync::LinkedList => None,
        }
    }

    /// Clear `enable` and `trigger` after a completed transfer.
    fn finish(&mut self) {
        self.control &= !(CTRL_ENABLE | CTRL_TRIGGER);
    }
}

// Interrupt register bit layout.
const IRQ_DUMMY_MASK: u32 = 0x3F;
const IRQ_RESERVED_MASK: u32 = 0x1FF << 6; // bits 6..14
const IRQ_FORCE: u32 = 1 << 15;
const IRQ_CH_ENABLE_SHIFT: u32 = 16;
const IRQ_CH_ENABLE_MASK: u32 = 0x7F << IRQ_CH_ENABLE_SHIFT; // bits 16..22
const IRQ_MASTER_ENABLE: u32 = 1 << 23;
const IRQ_CH_FLAGS_SHIFT: u32 = 24;
const IRQ_CH_FLAGS_MASK: u32 = 0x7F << IRQ_CH_FLAGS_SHIFT; // bits 24..30
const IRQ_SIGNAL: u32 = 1 << 31;

/// Recompute the `interrupt` register's derived `signal` bit and zero the
/// reserved 6..14 range.
fn recompute_interrupt(mut v: u32) -> u32 {
    v &= !IRQ_RESERVED_MASK;
    let force = v & IRQ_FORCE != 0;
    let master = v & IRQ_MASTER_ENABLE != 0;
    let enables = (v & IRQ_CH_ENABLE_MASK) >> IRQ_CH_ENABLE_SHIFT;
    let flags = (v & IRQ_CH_FLAGS_MASK) >> IRQ_CH_FLAGS_SHIFT;
    let signal = force || (master && (enables & flags) != 0);
    v &= !IRQ_SIGNAL;
    if signal {
        v |= IRQ_SIGNAL;
    }
    v
}

/// The DMA controller: 7 channels plus the global control/interrupt
/// registers.
pub struct Dma {
    /// `DPCR`: channel priority/enable bits. Reset `0x07654321`.
    control: u32,
    /// `DICR`: interrupt bookkeeping (§3).
    interrupt: u32,
    channels: [Channel; 7],
}

impl Default for Dma {
    fn default() -> Self {
        Self::new()
    }
}

impl Dma {
    pub fn new() -> Self {
        Self {
            control: 0x0765_4321,
            interrupt: 0,
            channels: [Channel::default(); 7],
        }
    }

    /// Read a controller/channel register. `offset` is relative to the DMA
    /// region base (`0x1F801080`).
    pub fn read(&self, offset: u32) -> Result<u32> {
        let major = (offset >> 4) & 7;
        let minor = offset & 0xF;
        match (major, minor) {
            (7, 0) => Ok(self.control),
            (7, 4) => Ok(self.interrupt),
            (ch, 0) if ch < 7 => Ok(self.channels[ch as usize].base),
            (ch, 4) if ch < 7 => Ok(self.channels[ch as usize].block_control),
            (ch, 8) if ch < 7 => Ok(self.channels[ch as usize].control),
            _ => Err(EmulatorError::OutOfRange { address: offset }),
        }
    }

    /// Write a controller/channel register. Returns the channel index if
    /// this write activated a channel and the caller must now run the
    /// transfer (`Bus` owns RAM and the GPU, so it drives the engine).
    pub fn write(&mut self, offset: u32, value: u32) -> Result<Option<usize>> {
        let major = (offset >> 4) & 7;
        let minor = offset & 0xF;
        match (major, minor) {
            (7, 0) => {
                self.control = value;
                log::trace!("DMA: control = {value:#010x}");
                Ok(None)
            }
            (7, 4) => {
                // Flags are cleared by writing 1s to them; force-irq,
                // channel-enables, master-enable and the dummy low bits are
                // taken straight from the written value; `signal` is then
                // recomputed from scratch.
                let surviving_flags = self.interrupt_flags_before(value);
                let merged = (value & (IRQ_FORCE | IRQ_CH_ENABLE_MASK | IRQ_MASTER_ENABLE | IRQ_DUMMY_MASK))
                    | surviving_flags;
                self.interrupt = recompute_interrupt(merged);
                log::trace!("DMA: interrupt write {value:#010x} -> {:#010x}", self.interrupt);
                Ok(None)
            }
            (ch, 0) if ch < 7 => {
                self.channels[ch as usize].base = value & BASE_MASK;
                Ok(None)
            }
            (ch, 4) if ch < 7 => {
                self.channels[ch as usize].block_control = value;
                Ok(None)
            }
            (ch, 8) if ch < 7 => {
                let idx = ch as usize;
                self.channels[idx].control = value;
                log::debug!("DMA: channel {idx} control = {value:#010x}");
                if self.channels[idx].active() {
                    Ok(Some(idx))
                } else {
                    Ok(None)
                }
            }
            _ => Err(EmulatorError::OutOfRange { address: offset }),
        }
    }

    /// The channel flag bits (24..30) prior to this write, with any bit
    /// also set in `value`'s flag range cleared (ack-on-write-1).
    fn interrupt_flags_before(&self, value: u32) -> u32 {
        let old_flags = self.interrupt & IRQ_CH_FLAGS_MASK;
        let clear = value & IRQ_CH_FLAGS_MASK;
        old_flags & !clear
    }

    /// Mark a channel's interrupt flag as set (DMA completion bookkeeping).
    ///
    /// TODO: no transfer path currently calls this — `spec.md` §4.3/§9
    /// leaves completion-interrupt bookkeeping unimplemented. The storage
    /// and read/write-ack semantics are in place so a future timer/IRQ
    /// model can wire it up.
    #[allow(dead_code)]
    fn set_channel_flag(&mut self, channel: usize) {
        self.interrupt = recompute_interrupt(self.interrupt | (1 << (IRQ_CH_FLAGS_SHIFT + channel as u32)));
    }

    /// Run the synchronous transfer for `channel` against `ram` and `gpu`,
    /// then clear `enable`/`trigger`. Called by [`crate::core::memory::Bus`]
    /// immediately after a `control` write activates the channel.
    pub fn run_transfer(&mut self, channel: usize, ram: &mut [u8], gpu: &mut Gpu) -> Result<()> {
        let port = PORTS[channel];
        let ch = self.channels[channel];
        log::debug!("DMA: running transfer on channel {channel} ({port:?}, {:?})", ch.sync());

        match ch.sync() {
            Sync::LinkedList => self.run_linked_list(channel, ram, gpu)?,
            Sync::Manual | Sync::Request => self.run_block(channel, ram, gpu)?,
        }

        self.channels[channel].finish();
        Ok(())
    }

    fn run_block(&self, channel: usize, ram: &mut [u8], gpu: &mut Gpu) -> Result<()> {
        let ch = self.channels[channel];
        let port = PORTS[channel];
        let size = ch.transfer_size().unwrap_or(0);
        let step: i32 = match ch.step() {
            Step::Increment => 4,
            Step::Decrement => -4,
        };
        let mut addr = ch.base;

        for remaining in (1..=size).rev() {
            let word_addr = (addr & RAM_ADDR_MASK) as usize;
            match (port, ch.direction()) {
                (Port::Gpu, Direction::FromRam) => {
                    let word = read_ram_word(ram, word_addr);
                    gpu.gp0(word)?;
                }
                (Port::Otc, Direction::ToRam) => {
                    let word = if remaining == 1 {
                        0x00FF_FFFF
                    } else {
                        addr.wrapping_sub(4) & 0x001F_FFFF
                    };
                    write_ram_word(ram, word_addr, word);
                }
                _ => {
                    return Err(EmulatorError::Unimplemented {
                        description: format!("DMA block transfer on port {port:?} direction {:?}", ch.direction()),
                    });
                }
            }
            addr = addr.wrapping_add(step as u32);
        }
        Ok(())
    }

    fn run_linked_list(&self, channel: usize, ram: &mut [u8], gpu: &mut Gpu) -> Result<()> {
        let ch = self.channels[channel];
        let port = PORTS[channel];
        if port != Port::Gpu || ch.direction() != Direction::FromRam {
            return Err(EmulatorError::Unimplemented {
                description: format!("linked-list DMA on port {port:?} direction {:?}", ch.direction()),
            });
        }

        let mut node = ch.base & RAM_ADDR_MASK;
        loop {
            let header = read_ram_word(ram, node as usize);
            let next = header & RAM_ADDR_MASK;
            let len = header >> 24;
            for i in 0..len {
                let word_addr = ((node + 4 + 4 * i) & RAM_ADDR_MASK) as usize;
                gpu.gp0(read_ram_word(ram, word_addr))?;
            }
            if header & 0x0080_0000 != 0 {
                break;
            }
            node = next;
        }
        Ok(())
    }
}

#[inline]
fn read_ram_word(ram: &[u8], addr: usize) -> u32 {
    u32::from_le_bytes([ram[addr], ram[addr + 1], ram[addr + 2], ram[addr + 3]])
}

#[inline]
fn write_ram_word(ram: &mut [u8], addr: usize, value: u32) {
    ram[addr..addr + 4].copy_from_slice(&value.to_le_bytes());
}
