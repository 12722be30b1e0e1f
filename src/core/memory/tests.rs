use super::*;
use crate::core::gpu::GpuChannel;
use std::sync::Arc;

fn bus() -> Bus {
    Bus::new(vec![0u8; BIOS_SIZE], Arc::new(GpuChannel::new())).unwrap()
}

#[test]
fn rejects_wrong_sized_bios() {
    let err = Bus::new(vec![0u8; 4], Arc::new(GpuChannel::new())).unwrap_err();
    assert!(matches!(err, EmulatorError::InvalidBios { expected: _, got: 4 }));
}

#[test]
fn ram_round_trips_every_width() {
    let mut b = bus();
    b.store8(0x0000_0010, 0xAB).unwrap();
    assert_eq!(b.load8(0x0000_0010).unwrap(), 0xAB);

    b.store16(0x0000_0020, 0xBEEF).unwrap();
    assert_eq!(b.load16(0x0000_0020).unwrap(), 0xBEEF);

    b.store32(0x0000_0030, 0xCAFE_BABE).unwrap();
    assert_eq!(b.load32(0x0000_0030).unwrap(), 0xCAFE_BABE);
}

#[test]
fn kseg0_and_kseg1_mirror_the_same_ram_word() {
    let mut b = bus();
    b.store32(0x0000_0100, 0x1122_3344).unwrap();
    assert_eq!(b.load32(0x8000_0100).unwrap(), 0x1122_3344);
    assert_eq!(b.load32(0xA000_0100).unwrap(), 0x1122_3344);
}

#[test]
fn bios_is_read_only() {
    let mut b = bus();
    let err = b.store8(0x1FC0_0000, 0xFF).unwrap_err();
    assert!(matches!(err, EmulatorError::OutOfRange { .. }));
}

#[test]
fn unmapped_address_is_out_of_range() {
    let mut b = bus();
    let err = b.load32(0x0500_0000).unwrap_err();
    assert!(matches!(err, EmulatorError::OutOfRange { .. }));
}

#[test]
fn memctl_read_is_out_of_range_but_write_is_ignored() {
    let mut b = bus();
    assert!(b.load32(0x1F80_1000).is_err());
    b.store32(0x1F80_1000, 0x1234).unwrap();
}

#[test]
fn spu_reads_zero_and_ignores_writes() {
    let mut b = bus();
    b.store16(0x1F80_1C00, 0xFFFF).unwrap();
    assert_eq!(b.load16(0x1F80_1C00).unwrap(), 0);
}

#[test]
fn gpu_status_reads_through_the_bus() {
    let mut b = bus();
    let v = b.load32(0x1F80_1814).unwrap();
    assert_eq!(v, b.gpu().status());
}

#[test]
fn gp0_write_through_bus_reaches_the_command_fifo() {
    let mut b = bus();
    b.store32(0x1F80_1810, 0x0100_0000).unwrap(); // clear cache, no-op
}

#[test]
fn dma_channel_write_through_bus_triggers_a_transfer() {
    let mut b = bus();
    // OTC channel (6): base = last entry, 4 entries, manual, decrement, trigger
    b.store32(0x1F80_10E0, 0x0000_000C).unwrap(); // MADR
    b.store32(0x1F80_10E4, 4).unwrap(); // BCR
    b.store32(0x1F80_10E8, 0x1100_0002).unwrap(); // CHCR: decrement, manual, enable+trigger
    assert_eq!(b.load32(0x0000_0000).unwrap(), 0x00FF_FFFF);
}
