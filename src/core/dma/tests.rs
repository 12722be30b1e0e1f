use super::*;
use crate::core::gpu::{Gpu, GpuChannel};
use std::sync::Arc;

fn gpu() -> Gpu {
    Gpu::new(Arc::new(GpuChannel::new()))
}

#[test]
fn control_register_resets_to_priority_default() {
    let dma = Dma::new();
    assert_eq!(dma.read(0x70).unwrap(), 0x0765_4321);
}

#[test]
fn channel_active_requires_enable_and_manual_trigger() {
    let mut ch = Channel::default();
    assert!(!ch.active());
    ch.control = CTRL_ENABLE; // enabled, manual sync, no trigger
    assert!(!ch.active());
    ch.control = CTRL_ENABLE | CTRL_TRIGGER;
    assert!(ch.active());
    ch.control = CTRL_ENABLE | (1 << CTRL_SYNC_SHIFT); // request sync, no trigger needed
    assert!(ch.active());
}

#[test]
fn channel_control_write_reports_activation() {
    let mut dma = Dma::new();
    let base_off = 2 * 0x10; // channel 2 (GPU)
    assert_eq!(dma.write(base_off + 8, CTRL_ENABLE).unwrap(), None);
    assert_eq!(dma.write(base_off + 8, CTRL_ENABLE | CTRL_TRIGGER).unwrap(), Some(2));
}

#[test]
fn interrupt_write_acks_flags() {
    let mut dma = Dma::new();
    dma.write(0x70 + 4, IRQ_MASTER_ENABLE | (1 << (IRQ_CH_ENABLE_SHIFT + 2))).unwrap();
    dma.interrupt = recompute_interrupt(dma.interrupt | (1 << (IRQ_CH_FLAGS_SHIFT + 2)));
    let before = dma.read(0x70 + 4).unwrap();
    assert_ne!(before & IRQ_SIGNAL, 0);

    // ack channel 2's flag, re-supplying the same enable bits (enables are
    // plain register bits, not latched — a write that omits them clears them)
    let ack = IRQ_MASTER_ENABLE | (1 << (IRQ_CH_ENABLE_SHIFT + 2)) | (1 << (IRQ_CH_FLAGS_SHIFT + 2));
    dma.write(0x70 + 4, ack).unwrap();
    let after = dma.read(0x70 + 4).unwrap();
    assert_eq!(after & (1 << (IRQ_CH_FLAGS_SHIFT + 2)), 0);
    assert_ne!(after & IRQ_CH_ENABLE_MASK, 0, "channel enables were re-supplied in the ack write");
    assert_eq!(after & IRQ_SIGNAL, 0, "signal drops once the only set flag is acked");
}

#[test]
fn otc_block_transfer_builds_reverse_linked_list() {
    let mut dma = Dma::new();
    let mut ram = vec![0u8; 64];
    let mut gpu = gpu();
    dma.channels[6].base = 0x1C; // 8 entries * 4 bytes - 4
    dma.channels[6].block_control = 8;
    dma.channels[6].control = CTRL_ENABLE | CTRL_TRIGGER | CTRL_STEP; // decrement, manual

    dma.run_transfer(6, &mut ram, &mut gpu).unwrap();

    assert_eq!(read_ram_word(&ram, 0x1C), 0x18);
    assert_eq!(read_ram_word(&ram, 0x00), 0x00FF_FFFF);
    assert!(!dma.channels[6].active());
}

#[test]
fn linked_list_transfer_stops_on_terminator() {
    let mut dma = Dma::new();
    let mut ram = vec![0u8; 32];
    let mut gpu = gpu();

    // node at 0: header says 1 payload word (a GP0 nop), next = 8
    write_ram_word(&mut ram, 0, (1 << 24) | 8);
    write_ram_word(&mut ram, 4, 0x0000_0000);
    // node at 8: terminator, 0 payload words
    write_ram_word(&mut ram, 8, 0x0080_0000);

    dma.channels[2].base = 0;
    dma.channels[2].control = CTRL_ENABLE | CTRL_TRIGGER | (2 << CTRL_SYNC_SHIFT) | CTRL_DIRECTION;

    dma.run_transfer(2, &mut ram, &mut gpu).unwrap();
}

#[test]
fn unsupported_block_transfer_port_is_unimplemented() {
    let mut dma = Dma::new();
    let mut ram = vec![0u8; 16];
    let mut gpu = gpu();
    dma.channels[4].block_control = 1;
    dma.channels[4].control = CTRL_ENABLE | CTRL_TRIGGER; // SPU, not implemented
    let err = dma.run_transfer(4, &mut ram, &mut gpu).unwrap_err();
    assert!(matches!(err, EmulatorError::Unimplemented { .. }));
}
