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

//! Headless driver for the machine core.
//!
//! This binary is a stand-in external presentation consumer: it runs the
//! emulator thread and logs the [`r3000a_core::core::gpu::GpuMsg`] stream
//! instead of rasterizing it (`spec.md` §1 names the rasterizer an external
//! collaborator). A real frontend would swap the `log::trace!` in the drain
//! loop for something that actually draws.

use clap::Parser;
use log::{error, info};
use r3000a_core::core::config::Config;
use r3000a_core::core::system::Machine;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Run the R3000A machine core against a BIOS image.
#[derive(Parser)]
#[command(name = "r3000a-core")]
#[command(about = "Headless MIPS R3000A machine core driver", long_about = None)]
struct Args {
    /// Path to `r3000a.toml`. Missing is fine if `--bios`/`R3000A_BIOS_PATH`
    /// supplies the BIOS path instead.
    #[arg(short, long, default_value = "r3000a.toml")]
    config: PathBuf,

    /// Path to the 512 KiB BIOS image, overriding the config file.
    #[arg(short, long)]
    bios: Option<PathBuf>,

    /// Stop after this many CPU instructions instead of running until a
    /// shutdown signal (there is no host-visible shutdown source in this
    /// headless driver besides that bound — `spec.md` §5 leaves signaling
    /// the actual shutdown flag to the presentation side).
    #[arg(short, long, default_value_t = 1_000_000)]
    steps: u64,
}

fn main() -> std::process::ExitCode {
    if let Err(e) = dotenvy::dotenv() {
        if !e.to_string().contains("not found") {
            eprintln!("warning: failed to load .env file: {e}");
        }
    }

    let args = Args::parse();

    let mut config = match Config::load(&args.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return std::process::ExitCode::FAILURE;
        }
    };
    if let Some(bios) = args.bios {
        config.bios_path = bios;
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level)).init();

    info!("r3000a-core v{}", env!("CARGO_PKG_VERSION"));
    info!("loading BIOS from {}", config.bios_path.display());

    let bios = match std::fs::read(&config.bios_path) {
        Ok(b) => b,
        Err(e) => {
            error!("failed to read BIOS file: {e}");
            return std::process::ExitCode::FAILURE;
        }
    };

    let shutdown = Arc::new(AtomicBool::new(false));
    let (mut machine, draw_messages) = match Machine::new(bios, shutdown.clone()) {
        Ok(m) => m,
        Err(e) => {
            error!("failed to initialize machine: {e}");
            return std::process::ExitCode::FAILURE;
        }
    };

    info!("running for up to {} instructions", args.steps);
    let steps = args.steps;
    let emulator = std::thread::spawn(move || {
        let result = machine.run_for(steps);
        shutdown.store(true, Ordering::SeqCst);
        result
    });

    let mut drawn = 0u64;
    loop {
        match draw_messages.consume() {
            Some(msg) => {
                log::trace!("draw message: {msg:?}");
                drawn += 1;
            }
            None => {
                if emulator.is_finished() {
                    draw_messages.drain();
                    break;
                }
                std::thread::yield_now();
            }
        }
    }

    match emulator.join() {
        Ok(Ok(())) => {
            info!("emulation finished cleanly, {drawn} draw messages observed");
            std::process::ExitCode::SUCCESS
        }
        Ok(Err(e)) => {
            error!("emulator thread stopped on error: {e}");
            std::process::ExitCode::FAILURE
        }
        Err(_) => {
            error!("emulator thread panicked");
            std::process::ExitCode::FAILURE
        }
    }
}
