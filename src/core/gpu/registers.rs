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

//! Small enums backing the GPU status word's multi-bit fields.

/// Texture page color depth (status bits 7-8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextureDepth {
    #[default]
    Bit4,
    Bit8,
    Bit15,
}

impl TextureDepth {
    pub fn from_bits(v: u32) -> Self {
        match v & 0b11 {
            0 => TextureDepth::Bit4,
            1 => TextureDepth::Bit8,
            _ => TextureDepth::Bit15,
        }
    }

    pub fn bits(self) -> u32 {
        match self {
            TextureDepth::Bit4 => 0,
            TextureDepth::Bit8 => 1,
            TextureDepth::Bit15 => 2,
        }
    }
}

/// Vertical resolution (status bit 19). Always forced to `R240` by this
/// core (`spec.md` §4.4/§9 — double-height mode is out of scope).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerticalRes {
    #[default]
    R240,
    R480,
}

/// Video timing standard (status bit 20).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VideoMode {
    #[default]
    Ntsc,
    Pal,
}

/// Display output color depth (status bit 21).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayDepth {
    #[default]
    Bit15,
    Bit24,
}

/// DMA direction as selected by GP1(0x04) (status bits 29-30).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DmaDirection {
    #[default]
    Off,
    Fifo,
    CpuToGp0,
    VramToCpu,
}

impl DmaDirection {
    pub fn from_bits(v: u32) -> Self {
        match v & 0b11 {
            0 => DmaDirection::Off,
            1 => DmaDirection::Fifo,
            2 => DmaDirection::CpuToGp0,
            _ => DmaDirection::VramToCpu,
        }
    }

    pub fn bits(self) -> u32 {
        match self {
            DmaDirection::Off => 0,
            DmaDirection::Fifo => 1,
            DmaDirection::CpuToGp0 => 2,
            DmaDirection::VramToCpu => 3,
        }
    }
}
