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

use criterion::{criterion_group, criterion_main, Criterion};
use r3000a_core::core::cpu::Cpu;
use r3000a_core::core::gpu::GpuChannel;
use r3000a_core::core::memory::Bus;
use std::hint::black_box;
use std::sync::Arc;

fn bios_of(words: &[u32]) -> Vec<u8> {
    let mut bios = vec![0u8; 512 * 1024];
    for (i, word) in words.iter().enumerate() {
        bios[i * 4..i * 4 + 4].copy_from_slice(&word.to_le_bytes());
    }
    bios
}

fn bus_with(words: &[u32]) -> Bus {
    Bus::new(bios_of(words), Arc::new(GpuChannel::new())).unwrap()
}

fn cpu_step_benchmark(c: &mut Criterion) {
    c.bench_function("cpu_step_nop", |b| {
        // 0x00000000 is SLL r0, r0, 0, a legal no-op encoding.
        let mut bus = bus_with(&[0x0000_0000; 2]);

        b.iter(|| {
            let mut cpu = Cpu::new();
            black_box(cpu.step(&mut bus).unwrap());
        });
    });

    c.bench_function("cpu_step_arithmetic", |b| {
        // addiu r1, r0, 1 ; addu r2, r1, r1
        let mut bus = bus_with(&[0x2401_0001, 0x0021_1021]);

        b.iter(|| {
            let mut cpu = Cpu::new();
            cpu.step(&mut bus).unwrap();
            black_box(cpu.step(&mut bus).unwrap());
        });
    });

    c.bench_function("cpu_step_branch", |b| {
        // beq r0, r0, -1 (branches back to itself, one delay slot of NOP)
        let mut bus = bus_with(&[0x1000_FFFF, 0x0000_0000]);

        b.iter(|| {
            let mut cpu = Cpu::new();
            for _ in 0..8 {
                black_box(cpu.step(&mut bus).unwrap());
            }
        });
    });
}

fn cpu_register_access_benchmark(c: &mut Criterion) {
    c.bench_function("cpu_register_read", |b| {
        let cpu = Cpu::new();
        b.iter(|| {
            for i in 0..32u8 {
                black_box(cpu.reg(i));
            }
        });
    });
}

criterion_group!(benches, cpu_step_benchmark, cpu_register_access_benchmark);
criterion_main!(benches);
