

use std::cell::RefCell;
use std::rc::Rc;

use crate::{Address, Bus, Bus16, BusAccessKind};

/// Notifier that records every fault it is handed.
#[derive(Clone, Default)]
pub(crate) struct FaultLog(Rc<RefCell<Vec<(Address, BusAccessKind)>>>);

impl FaultLog {
    pub(crate) fn bus<'a>(&self) -> Bus16<'a> {
        self.bus_with_width()
    }

    pub(crate) fn bus_with_width<'a, const ADDRESS_BITS: u32>(&self) -> Bus<'a, ADDRESS_BITS> {
        let log = self.0.clone();
        Bus::new(move |addr, kind| log.borrow_mut().push((addr, kind)))
    }

    pub(crate) fn take(&self) -> Vec<(Address, BusAccessKind)> {
        std::mem::take(&mut *self.0.borrow_mut())
    }
}
