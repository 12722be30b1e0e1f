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

//! Error types for the machine core.
//!
//! [`EmulatorError`] covers the fatal, non-architectural failures a running
//! machine can hit: an access to an unmapped physical address, an opcode or
//! DMA path this core doesn't implement, or a BIOS blob of the wrong size.
//! CPU architectural exceptions (`SysCall`, `Overflow`, `LoadAddr`, ...) are
//! not part of this type — they're ordinary control flow handled inside the
//! interpreter via coprocessor-0 and never surface here.

use thiserror::Error;

/// Result type used throughout the machine core.
pub type Result<T> = std::result::Result<T, EmulatorError>;

/// Fatal errors the machine core can raise.
///
/// None of these are recoverable: the propagation policy is "surface to the
/// emulator loop and stop", with no retry and no partial-state rollback.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmulatorError {
    /// An unmapped physical address, or a DMA register offset that doesn't
    /// decode to a known `(major, minor)` pair.
    #[error("out of range access at physical address 0x{address:08X}")]
    OutOfRange {
        /// The physical address (or DMA offset) that triggered the error.
        address: u32,
    },

    /// An opcode or DMA transfer path not covered by this core.
    #[error("unimplemented: {description}")]
    Unimplemented {
        /// Human-readable description of the missing path.
        description: String,
    },

    /// The BIOS blob handed to [`crate::core::memory::Bus::new`] was not
    /// exactly 512 KiB.
    #[error("invalid BIOS size: expected {expected} bytes, got {got} bytes")]
    InvalidBios {
        /// Expected size in bytes (512 KiB).
        expected: usize,
        /// Actual size of the supplied blob.
        got: usize,
    },
}

/// MIPS R3000A architectural exceptions.
///
/// These are ordinary control flow: the interpreter's fetch/execute loop
/// catches them and routes them through the coprocessor-0 exception entry
/// sequence (`§4.5`). They never become an [`EmulatorError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpuException {
    /// `syscall` instruction.
    SysCall,
    /// Signed arithmetic overflow (`add`, `addi`, `sub`).
    Overflow,
    /// Misaligned or otherwise invalid load address.
    LoadAddr {
        /// The offending virtual address.
        address: u32,
    },
    /// Misaligned or otherwise invalid store address.
    StoreAddr {
        /// The offending virtual address.
        address: u32,
    },
    /// `break` instruction.
    Break,
    /// Access to an absent/unimplemented coprocessor (cop1, cop3, LWC/SWC).
    CopE,
    /// Reserved/unknown opcode.
    IllegalInstr,
}

impl CpuException {
    /// The 5-bit exception code placed in `cause` bits 2..6 (`cause = excode
    /// << 2`).
    pub fn excode(self) -> u32 {
        match self {
            CpuException::IllegalInstr => 0x0A,
            CpuException::CopE => 0x0B,
            CpuException::Overflow => 0x0C,
            CpuException::SysCall => 0x08,
            CpuException::Break => 0x09,
            CpuException::LoadAddr { .. } => 0x04,
            CpuException::StoreAddr { .. } => 0x05,
        }
    }
}
