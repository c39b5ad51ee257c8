//! Single-flight guards
//!
//! At most one mutating request per entity may be outstanding. The guard
//! releases on drop, so every exit path (early return, error, cancelled
//! future) frees the entity again.

use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

use crate::types::error::PanelError;

pub struct SingleFlight {
    entity: &'static str,
    busy: AtomicBool,
}

impl SingleFlight {
    pub const fn new(entity: &'static str) -> Self {
        Self {
            entity,
            busy: AtomicBool::new(false),
        }
    }

    /// Claim the entity, or fail with `Busy` if a request is outstanding
    pub fn try_acquire(&self) -> Result<FlightGuard<'_>, PanelError> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!(entity = self.entity, "Refusing duplicate submission");
            return Err(PanelError::Busy(self.entity.to_string()));
        }
        Ok(FlightGuard { busy: &self.busy })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

#[must_use = "the entity is released as soon as the guard is dropped"]
pub struct FlightGuard<'a> {
    busy: &'a AtomicBool,
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_acquire_refused_until_release() {
        let flight = SingleFlight::new("intake settings");
        let guard = flight.try_acquire().unwrap();
        assert!(flight.is_busy());

        match flight.try_acquire() {
            Err(PanelError::Busy(entity)) => assert_eq!(entity, "intake settings"),
            _ => panic!("expected Busy"),
        }

        drop(guard);
        assert!(!flight.is_busy());
        assert!(flight.try_acquire().is_ok());
    }
}
