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

//! A PlayStation-class machine core: MIPS R3000A interpreter, address
//! translation, DMA controller, and GPU command front-end (`spec.md` §1-2).
//!
//! This crate has no rasterizer, windowing, or BIOS-acquisition logic of its
//! own — those are external collaborators. What it produces is a stream of
//! [`core::gpu::GpuMsg`]s over a blocking single-slot hand-off
//! ([`core::gpu::GpuChannel`]) for a presentation layer to consume.
//!
//! # Example
//!
//! ```
//! use std::sync::atomic::AtomicBool;
//! use std::sync::Arc;
//! use r3000a_core::core::system::Machine;
//!
//! let bios = vec![0u8; 512 * 1024];
//! let shutdown = Arc::new(AtomicBool::new(false));
//! let (mut machine, draw_messages) = Machine::new(bios, shutdown).unwrap();
//!
//! // Run a bounded number of steps instead of `machine.run()` forever.
//! machine.run_for(4).unwrap();
//! let _ = draw_messages.consume();
//! ```

pub mod core;

