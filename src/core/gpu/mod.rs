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

//! GPU front-end: the GP0 command FIFO and GP1 control port.
//!
//! This is deliberately not a rasterizer. The GP0 parser tracks just enough
//! draw state (texpage, draw area, texture window, mask bits, display mode)
//! to decode the opcode table in `spec.md` §4.4 and emit [`GpuMsg`]s; no
//! VRAM is modeled and no pixels are produced.

mod channel;
pub mod registers;

pub use channel::{GpuChannel, GpuMsg, Vertex};
pub use registers::{DisplayDepth, DmaDirection, TextureDepth, VerticalRes, VideoMode};

use crate::core::error::{EmulatorError, Result};
use std::sync::Arc;


/// GP0 front-end mode: decoding a command, or draining an image-transfer
/// payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Gp0Mode {
    Command,
    ImageLoad,
}

/// The GP0/GP1 command front-end.
pub struct Gpu {
    // Draw mode (GP0 0xE1).
    texpage_x: u32,
    texpage_y: u32,
    semi_transparency: u32,
    texture_depth: TextureDepth,
    dither: bool,
    draw_to_display: bool,
    texture_disable: bool,
    tex_x_flip: bool,
    tex_y_flip: bool,

    // Mask bit setting (GP0 0xE6).
    force_mask: bool,
    skip_masked: bool,

    // Misc status bits not otherwise derived.
    field: bool,
    reverse: bool,
    irq: bool,

    // Display mode (GP1 0x08).
    hres2: bool,
    hres: u32,
    vres: VerticalRes,
    vmode: VideoMode,
    display_depth: DisplayDepth,
    interlaced: bool,
    display_disable: bool,
    dma_direction: DmaDirection,

    // Texture window (GP0 0xE2).
    tex_win_mask_x: u32,
    tex_win_mask_y: u32,
    tex_win_offset_x: u32,
    tex_win_offset_y: u32,

    // Draw area (GP0 0xE3/0xE4/0xE5).
    draw_area_left: u32,
    draw_area_top: u32,
    draw_area_right: u32,
    draw_area_bottom: u32,
    draw_offset_x: i32,
    draw_offset_y: i32,

    // Display attributes (GP1 0x05/0x06/0x07).
    vram_start_x: u32,
    vram_start_y: u32,
    hdisplay_start: u32,
    hdisplay_end: u32,
    vdisplay_start: u32,
    vdisplay_end: u32,

    // Command FIFO.
    cmd_buffer: [u32; 12],
    cmd_len: usize,
    arg_remaining: u32,
    handler: Option<Gp0Handler>,
    mode: Gp0Mode,

    sink: Arc<GpuChannel>,
}

type Gp0Handler = fn(&mut Gpu, &[u32]) -> Result<()>;

impl Gpu {
    /// Build a GPU front-end handing draw messages to `sink`.
    pub fn new(sink: Arc<GpuChannel>) -> Self {
        let mut gpu = Self {
            texpage_x: 0,
            texpage_y: 0,
            semi_transparency: 0,
            texture_depth: TextureDepth::default(),
            dither: false,
            draw_to_display: false,
            texture_disable: false,
            tex_x_flip: false,
            tex_y_flip: false,
            force_mask: false,
            skip_masked: false,
            field: true,
            reverse: false,
            irq: false,
            hres2: false,
            hres: 0,
            vres: VerticalRes::default(),
            vmode: VideoMode::default(),
            display_depth: DisplayDepth::default(),
            interlaced: false,
            display_disable: true,
            dma_direction: DmaDirection::default(),
            tex_win_mask_x: 0,
            tex_win_mask_y: 0,
            tex_win_offset_x: 0,
            tex_win_offset_y: 0,
            draw_area_left: 0,
            draw_area_top: 0,
            draw_area_right: 0,
            draw_area_bottom: 0,
            draw_offset_x: 0,
            draw_offset_y: 0,
            vram_start_x: 0,
            vram_start_y: 0,
            hdisplay_start: 0x200,
            hdisplay_end: 0xC00,
            vdisplay_start: 0x10,
            vdisplay_end: 0x100,
            cmd_buffer: [0; 12],
            cmd_len: 0,
            arg_remaining: 0,
            handler: None,
            mode: Gp0Mode::Command,
            sink,
        };
        gpu.reset_command_buffer();
        gpu
    }

    fn reset_command_buffer(&mut self) {
        self.cmd_buffer = [0; 12];
        self.cmd_len = 0;
        self.arg_remaining = 0;
        self.handler = None;
        self.mode = Gp0Mode::Command;
    }

    fn emit(&self, msg: GpuMsg) {
        self.sink.put(msg);
    }

    /// The packed GPU status word (`GPUSTAT`).
    pub fn status(&self) -> u32 {
        let mut v = 0u32;
        v |= self.texpage_x & 0xF;
        v |= (self.texpage_y & 1) << 4;
        v |= (self.semi_transparency & 0b11) << 5;
        v |= self.texture_depth.bits() << 7;
        v |= (self.dither as u32) << 9;
        v |= (self.draw_to_display as u32) << 10;
        v |= (self.force_mask as u32) << 11;
        v |= (self.skip_masked as u32) << 12;
        v |= (self.field as u32) << 13;
        v |= (self.reverse as u32) << 14;
        v |= (self.texture_disable as u32) << 15;
        v |= (self.hres2 as u32) << 16;
        v |= (self.hres & 0b11) << 17;
        v |= (matches!(self.vres, VerticalRes::R480) as u32) << 19;
        v |= (matches!(self.vmode, VideoMode::Pal) as u32) << 20;
        v |= (matches!(self.display_depth, DisplayDepth::Bit24) as u32) << 21;
        v |= (self.interlaced as u32) << 22;
        v |= (self.display_disable as u32) << 23;
        v |= (self.irq as u32) << 24;
        v |= (self.dma_request() as u32) << 25;
        v |= 1 << 26; // ready to receive command word
        // bit 27 (ready to send VRAM to CPU) stays 0: no VRAM is modeled, so
        // a VRAM->CPU read can never actually be ready (spec.md §4.4, GP1
        // 0x00 reset value 0x14802000 has this bit clear).
        v |= 1 << 28; // ready to receive DMA block
        v |= self.dma_direction.bits() << 29;
        v
    }

    fn dma_request(&self) -> bool {
        !matches!(self.dma_direction, DmaDirection::Off)
    }

    /// `GPUREAD`: placeholder zero (no VRAM readback modeled).
    pub fn read(&self) -> u32 {
        0
    }

    /// Push one word into the GP0 command FIFO.
    pub fn gp0(&mut self, word: u32) -> Result<()> {
        match self.mode {
            Gp0Mode::ImageLoad => {
                self.arg_remaining = self.arg_remaining.saturating_sub(1);
                if self.arg_remaining == 0 {
                    self.mode = Gp0Mode::Command;
                }
                Ok(())
            }
            Gp0Mode::Command => {
                if self.arg_remaining == 0 {
                    let opcode = (word >> 24) as u8;
                    let (argc, handler) = gp0_opcode_info(opcode).ok_or_else(|| {
                        EmulatorError::Unimplemented {
                            description: format!("unknown GP0 opcode {opcode:#04x}"),
                        }
                    })?;
                    self.cmd_len = 0;
                    self.handler = Some(handler);
                    self.arg_remaining = argc;
                }
                self.cmd_buffer[self.cmd_len] = word;
                self.cmd_len += 1;
                self.arg_remaining -= 1;
                if self.arg_remaining == 0 {
                    let handler = self.handler.take().expect("handler set when arg_remaining reached 0");
                    let mut buf = [0u32; 12];
                    buf[..self.cmd_len].copy_from_slice(&self.cmd_buffer[..self.cmd_len]);
                    let len = self.cmd_len;
                    handler(self, &buf[..len])?;
                }
                Ok(())
            }
        }
    }

    /// Write a GP1 control-register word, dispatched on its top 8 bits.
    pub fn gp1(&mut self, word: u32) {
        let opcode = (word >> 24) as u8;
        match opcode {
            0x00 => self.gp1_reset(),
            0x01 => self.reset_command_buffer(),
            0x02 => self.irq = false,
            0x03 => self.display_disable = word & 1 != 0,
            0x04 => self.dma_direction = DmaDirection::from_bits(word),
            0x05 => {
                self.vram_start_x = word & 0x3FE;
                self.vram_start_y = (word >> 10) & 0x1FF;
            }
            0x06 => {
                self.hdisplay_start = word & 0xFFF;
                self.hdisplay_end = (word >> 12) & 0xFFF;
            }
            0x07 => {
                self.vdisplay_start = word & 0x3FF;
                self.vdisplay_end = (word >> 10) & 0x3FF;
            }
            0x08 => {
                self.hres2 = word & 0x40 != 0;
                self.hres = word & 0b11;
                // vres bit intentionally ignored: always R240 (§4.4/§9).
                self.vres = VerticalRes::R240;
                self.vmode = if word & 0x08 != 0 { VideoMode::Pal } else { VideoMode::Ntsc };
                self.display_depth = if word & 0x10 != 0 { DisplayDepth::Bit24 } else { DisplayDepth::Bit15 };
                self.interlaced = word & 0x20 != 0;
                self.reverse = word & 0x80 != 0;
            }
            _ => log::warn!("GP1: unhandled opcode {opcode:#04x} ({word:#010x})"),
        }
    }

    fn gp1_reset(&mut self) {
        self.texpage_x = 0;
        self.texpage_y = 0;
        self.semi_transparency = 0;
        self.texture_depth = TextureDepth::default();
        self.dither = false;
        self.draw_to_display = false;
        self.texture_disable = false;
        self.tex_x_flip = false;
        self.tex_y_flip = false;
        self.force_mask = false;
        self.skip_masked = false;
        self.field = true;
        self.reverse = false;
        self.irq = false;
        self.hres2 = false;
        self.hres = 0;
        self.vres = VerticalRes::R240;
        self.vmode = VideoMode::Ntsc;
        self.display_depth = DisplayDepth::Bit15;
        self.interlaced = false;
        self.display_disable = true;
        self.dma_direction = DmaDirection::Off;
        self.tex_win_mask_x = 0;
        self.tex_win_mask_y = 0;
        self.tex_win_offset_x = 0;
        self.tex_win_offset_y = 0;
        self.draw_area_left = 0;
        self.draw_area_top = 0;
        self.draw_area_right = 0;
        self.draw_area_bottom = 0;
        self.draw_offset_x = 0;
        self.draw_offset_y = 0;
        self.vram_start_x = 0;
        self.vram_start_y = 0;
        self.hdisplay_start = 0x200;
        self.hdisplay_end = 0xC00;
        self.vdisplay_start = 0x10;
        self.vdisplay_end = 0x100;
        self.reset_command_buffer();
    }
}

/// `(argument count including header, handler)` for every implemented GP0
/// opcode.
fn gp0_opcode_info(opcode: u8) -> Option<(u32, Gp0Handler)> {
    Some(match opcode {
        0x00 => (1, gp0_nop),
        0x01 => (1, gp0_clear_cache),
        0x28 => (5, gp0_mono_quad),
        0x2C => (9, gp0_textured_quad),
        0x30 => (6, gp0_shaded_triangle),
        0x38 => (8, gp0_shaded_quad),
        0xA0 => (3, gp0_image_load),
        0xC0 => (3, gp0_image_store),
        0xE1 => (1, gp0_draw_mode),
        0xE2 => (1, gp0_texture_window),
        0xE3 => (1, gp0_draw_area_top_left),
        0xE4 => (1, gp0_draw_area_bottom_right),
        0xE5 => (1, gp0_drawing_offset),
        0xE6 => (1, gp0_mask_bit),
        _ => return None,
    })
}

fn gp0_nop(_gpu: &mut Gpu, _buf: &[u32]) -> Result<()> {
    Ok(())
}

fn gp0_clear_cache(_gpu: &mut Gpu, _buf: &[u32]) -> Result<()> {
    log::trace!("GP0: clear texture cache (no-op)");
    Ok(())
}

/// Sign-extend an 11-bit field to `i32`.
fn sign_extend11(v: u32) -> i32 {
    (((v & 0x7FF) as i32) << 21) >> 21
}

fn decode_position(word: u32) -> (i32, i32) {
    (sign_extend11(word), sign_extend11(word >> 16))
}

fn decode_color(word: u32) -> (u32, u32, u32) {
    (word & 0xFF, (word >> 8) & 0xFF, (word >> 16) & 0xFF)
}

fn vertex_at(pos_word: u32, (r, g, b): (u32, u32, u32)) -> Vertex {
    let (x, y) = decode_position(pos_word);
    Vertex { x, y, r, g, b }
}

fn gp0_mono_quad(gpu: &mut Gpu, buf: &[u32]) -> Result<()> {
    let color = decode_color(buf[0]);
    let verts = [
        vertex_at(buf[1], color),
        vertex_at(buf[2], color),
        vertex_at(buf[3], color),
        vertex_at(buf[4], color),
    ];
    gpu.emit(GpuMsg::Quad(verts));
    Ok(())
}

fn gp0_textured_quad(gpu: &mut Gpu, buf: &[u32]) -> Result<()> {
    // Per spec.md §4.4: texture sampling isn't modeled; color is forced.
    const FORCED: (u32, u32, u32) = (0x80, 0, 0);
    let verts = [
        vertex_at(buf[1], FORCED),
        vertex_at(buf[3], FORCED),
        vertex_at(buf[5], FORCED),
        vertex_at(buf[7], FORCED),
    ];
    gpu.emit(GpuMsg::Quad(verts));
    Ok(())
}

fn gp0_shaded_triangle(gpu: &mut Gpu, buf: &[u32]) -> Result<()> {
    let verts = [
        vertex_at(buf[1], decode_color(buf[0])),
        vertex_at(buf[3], decode_color(buf[2])),
        vertex_at(buf[5], decode_color(buf[4])),
    ];
    gpu.emit(GpuMsg::Triangle(verts));
    Ok(())
}

fn gp0_shaded_quad(gpu: &mut Gpu, buf: &[u32]) -> Result<()> {
    let verts = [
        vertex_at(buf[1], decode_color(buf[0])),
        vertex_at(buf[3], decode_color(buf[2])),
        vertex_at(buf[5], decode_color(buf[4])),
        vertex_at(buf[7], decode_color(buf[6])),
    ];
    gpu.emit(GpuMsg::Quad(verts));
    Ok(())
}

fn gp0_image_load(gpu: &mut Gpu, buf: &[u32]) -> Result<()> {
    let w = buf[2] & 0xFFFF;
    let h = (buf[2] >> 16) & 0xFFFF;
    let pixels = w.wrapping_mul(h);
    gpu.arg_remaining = pixels.div_ceil(2);
    gpu.mode = Gp0Mode::ImageLoad;
    Ok(())
}

fn gp0_image_store(_gpu: &mut Gpu, _buf: &[u32]) -> Result<()> {
    log::trace!("GP0: image store (no-op, not rendered)");
    Ok(())
}

fn gp0_draw_mode(gpu: &mut Gpu, buf: &[u32]) -> Result<()> {
    let v = buf[0];
    gpu.texpage_x = v & 0xF;
    gpu.texpage_y = (v >> 4) & 1;
    gpu.semi_transparency = (v >> 5) & 0b11;
    gpu.texture_depth = TextureDepth::from_bits(v >> 7);
    gpu.dither = v & (1 << 9) != 0;
    gpu.draw_to_display = v & (1 << 10) != 0;
    gpu.texture_disable = v & (1 << 11) != 0;
    gpu.tex_x_flip = v & (1 << 12) != 0;
    gpu.tex_y_flip = v & (1 << 13) != 0;
    Ok(())
}

fn gp0_texture_window(gpu: &mut Gpu, buf: &[u32]) -> Result<()> {
    let v = buf[0];
    gpu.tex_win_mask_x = v & 0x1F;
    gpu.tex_win_mask_y = (v >> 5) & 0x1F;
    gpu.tex_win_offset_x = (v >> 10) & 0x1F;
    gpu.tex_win_offset_y = (v >> 15) & 0x1F;
    Ok(())
}

fn gp0_draw_area_top_left(gpu: &mut Gpu, buf: &[u32]) -> Result<()> {
    let v = buf[0];
    gpu.draw_area_left = v & 0x3FF;
    gpu.draw_area_top = (v >> 10) & 0x3FF;
    Ok(())
}

fn gp0_draw_area_bottom_right(gpu: &mut Gpu, buf: &[u32]) -> Result<()> {
    let v = buf[0];
    gpu.draw_area_right = v & 0x3FF;
    gpu.draw_area_bottom = (v >> 10) & 0x3FF;
    Ok(())
}

fn gp0_drawing_offset(gpu: &mut Gpu, buf: &[u32]) -> Result<()> {
    let v = buf[0];
    let x = sign_extend11(v);
    let y = sign_extend11(v >> 11);
    gpu.draw_offset_x = x;
    gpu.draw_offset_y = y;
    gpu.emit(GpuMsg::Offset { x, y });
    gpu.emit(GpuMsg::Draw);
    Ok(())
}

fn gp0_mask_bit(gpu: &mut Gpu, buf: &[u32]) -> Result<()> {
    let v = buf[0];
    gpu.force_mask = v & 1 != 0;
    gpu.skip_masked = v & 2 != 0;
    Ok(())
}
