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

//! The machine core: CPU, memory bus, DMA controller, GPU front-end, and
//! the driver that wires them together (`spec.md` §2).
//!
//! Out of scope for this core, and not modeled here: CD-ROM, SPU, GTE,
//! timers, controller ports, the interrupt controller, and any rendering of
//! [`gpu::GpuMsg`]s into pixels (`spec.md` §1).

pub mod config;
pub mod cpu;
pub mod dma;
pub mod error;
pub mod gpu;
pub mod memory;
pub mod system;

pub use config::Config;
pub use cpu::Cpu;
pub use dma::Dma;
pub use error::{CpuException, EmulatorError, Result};
pub use gpu::Gpu;
pub use memory::Bus;
pub use system::Machine;
