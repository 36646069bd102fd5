use std::cell::RefCell;

use nes_bus::{Bus16, BusAccessKind, BusFault, Device, MapError, MemoryMappedDevice, Sram};

#[test]
fn read_from_unregistered_address() {
    let faults = RefCell::new(Vec::new());
    let mut bus = Bus16::new(|addr, kind| faults.borrow_mut().push((addr, kind)));

    let mut buf = [0u8; 2 * 1024];
    bus.read(0x100, &mut buf[..1]);

    drop(bus);
    assert_eq!(faults.into_inner(), vec![(0x100, BusAccessKind::Read)]);
}

#[test]
fn read_from_single_registration() {
    let sram = Sram::<1024>::new();
    sram.fill(0xCE);
    let faults = RefCell::new(Vec::new());
    let mut bus = Bus16::new(|addr, kind| faults.borrow_mut().push((addr, kind)));
    sram.map(&mut bus, 0x8000).unwrap();

    let mut buf = [0u8; 2 * 1024];
    bus.read(0x8000, &mut buf[..0x100]);

    assert_eq!(&buf[..0x100], &sram.to_vec()[..0x100]);
    assert_eq!(buf[0x100], 0);
    drop(bus);
    assert!(faults.into_inner().is_empty());
}

#[test]
fn map_onto_existing_registration() {
    let sram = Sram::<1024>::new();
    let mut bus = Bus16::without_notifier();

    sram.map(&mut bus, 0).unwrap();
    let err = sram.map(&mut bus, 0).unwrap_err();
    assert_eq!(
        err,
        MapError::AlreadyMapped {
            address: 0,
            len: 1024,
            page: 0
        }
    );
    assert_eq!(
        err.to_string(),
        "address range 0x0000+0x400 already mapped (page 0 is occupied)"
    );
}

#[test]
fn map_into_middle_of_page() {
    let sram = Sram::<512>::new();
    sram.fill(0xCE);
    let mut bus = Bus16::new(|addr, kind| panic!("unexpected {kind} fault at {addr:#x}"));
    sram.map(&mut bus, 256).unwrap();

    let mut buf = [0u8; 1024];
    bus.read(256, &mut buf[..511]);

    assert_eq!(&buf[..511], &[0xCE; 511][..]);
    assert_eq!(buf[511], 0);
}

#[test]
fn read_over_end_of_registration() {
    let sram = Sram::<0x200>::new();
    sram.fill(0xCE);
    let mut bus = Bus16::without_notifier();
    sram.map(&mut bus, 0x100).unwrap();

    let mut buf = [0u8; 0x400];
    let fault = bus.try_read(0x100, &mut buf[..0x300]).unwrap_err();

    assert_eq!(
        fault,
        BusFault {
            address: 0x300,
            kind: BusAccessKind::Read
        }
    );
    assert_eq!(&buf[..0x200], &[0xCE; 0x200][..]);
    assert!(buf[0x200..].iter().all(|&b| b == 0));
}

#[test]
fn read_across_two_registrations() {
    let first = Sram::<0x200>::new();
    let second = Sram::<0x200>::new();
    first.fill(0xCE);
    second.fill(0xA5);
    let mut bus = Bus16::new(|addr, kind| panic!("unexpected {kind} fault at {addr:#x}"));
    first.map(&mut bus, 0x200).unwrap();
    second.map(&mut bus, 0x400).unwrap();

    let mut buf = [0u8; 0x500];
    bus.read(0x200, &mut buf[..0x400]);

    assert_eq!(&buf[..0x200], &[0xCE; 0x200][..]);
    assert_eq!(&buf[0x200..0x400], &[0xA5; 0x200][..]);
    assert_eq!(buf[0x400], 0);
}

#[test]
fn multi_page_device_is_contiguous_on_the_bus() {
    let sram = Sram::<0x2000>::new();
    for i in 0..sram.size() {
        sram.load(i, &[(i >> 8) as u8 ^ i as u8]).unwrap();
    }
    let mut bus = Bus16::without_notifier();
    sram.map(&mut bus, 0x6000).unwrap();

    let mut buf = vec![0u8; 0x2000];
    assert_eq!(bus.try_read(0x6000, &mut buf), Ok(()));
    assert_eq!(buf, sram.to_vec());

    // A read starting deep inside a later page still resolves against the whole registration.
    assert_eq!(bus.read_u8(0x7ABC), sram.get(0x1ABC).unwrap());
    assert_eq!(bus.mappings().count(), 8);
}
