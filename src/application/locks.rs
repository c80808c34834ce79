use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use uuid::Uuid;

/// Per-shopper mutual exclusion for cart mutation and checkout.
///
/// Slots are created on demand and dropped again once no caller holds them.
#[derive(Default)]
pub struct ShopperLocks {
    slots: Mutex<HashMap<Uuid, Arc<Mutex<()>>>>,
}

impl ShopperLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `f` while holding the lock for `shopper_id`.
    pub fn with_lock<T>(&self, shopper_id: Uuid, f: impl FnOnce() -> T) -> T {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(slots.entry(shopper_id).or_default())
        };

        let result = {
            let _guard = slot.lock().unwrap_or_else(PoisonError::into_inner);
            f()
        };

        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        // Only the map and this call still reference the slot.
        if Arc::strong_count(&slot) == 2 {
            slots.remove(&shopper_id);
        }
        result
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
