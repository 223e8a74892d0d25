use time::{error::IndeterminateOffset, Date, OffsetDateTime, UtcOffset};

/// Something that knows what day it is
pub(crate) trait Clock {
    fn today(&self) -> Date;
}

/// The system clock in the local timezone.  The local offset is looked up
/// again on every call; if that fails, the offset found at startup is used.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct LocalClock {
    fallback: UtcOffset,
}

impl LocalClock {
    pub(crate) fn new() -> Result<LocalClock, IndeterminateOffset> {
        Ok(LocalClock {
            fallback: UtcOffset::current_local_offset()?,
        })
    }
}

impl Clock for LocalClock {
    fn today(&self) -> Date {
        let offset = UtcOffset::current_local_offset().unwrap_or(self.fallback);
        let now = OffsetDateTime::now_utc();
        now.checked_to_offset(offset).unwrap_or(now).date()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    /// A clock that only moves when told to.  Clones share the same date.
    #[derive(Clone, Debug, Eq, PartialEq)]
    pub(crate) struct ManualClock(Rc<Cell<Date>>);

    impl ManualClock {
        pub(crate) fn new(today: Date) -> ManualClock {
            ManualClock(Rc::new(Cell::new(today)))
        }

        pub(crate) fn set(&self, today: Date) {
            self.0.set(today);
        }
    }

    impl Clock for ManualClock {
        fn today(&self) -> Date {
            self.0.get()
        }
    }
}
