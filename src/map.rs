use std::any::type_name;
use std::fmt;

use indexmap::IndexMap;

use crate::command::OptionId;
use crate::value::Slot;

/// Results of a successful parse, keyed by option identifier.
///
/// Each entry holds the concrete type the definition declared: `()` for a
/// switch, `T` for a scalar, `Option<T>` for an optional value, `Vec<T>` for
/// a repeated value. [`get`](OptionMap::get) recovers the typed value;
/// asking with the wrong type, or for an absent entry, is a caller bug and
/// panics. Use [`has`](OptionMap::has) or
/// [`get_optional`](OptionMap::get_optional) when presence is in question.
pub struct OptionMap<O: OptionId> {
    slots: IndexMap<O, Slot>,
}

impl<O: OptionId> OptionMap<O> {
    pub(crate) fn new() -> Self {
        Self {
            slots: IndexMap::new(),
        }
    }

    pub(crate) fn insert_slot(&mut self, id: O, slot: Slot) {
        self.slots.insert(id, slot);
    }

    pub(crate) fn take_slot(&mut self, id: O) -> Option<Slot> {
        self.slots.shift_remove(&id)
    }

    /// Whether `id` received a value, from a token or a default.
    pub fn has(&self, id: O) -> bool {
        self.slots.contains_key(&id)
    }

    /// The stored value for `id`.
    ///
    /// # Panics
    ///
    /// Panics when `id` has no entry or when `T` is not the type the
    /// definition stores.
    pub fn get<T: 'static>(&self, id: O) -> &T {
        let slot = self
            .slots
            .get(&id)
            .unwrap_or_else(|| panic!("option {id:?} has no value; check has() first"));
        slot.downcast_ref::<T>()
            .unwrap_or_else(|| panic!("option {id:?} does not store a {}", type_name::<T>()))
    }

    /// The stored value for `id`, or `None` when absent.
    ///
    /// # Panics
    ///
    /// Panics when the entry exists but `T` is not the stored type.
    pub fn get_optional<T: 'static>(&self, id: O) -> Option<&T> {
        let slot = self.slots.get(&id)?;
        Some(
            slot.downcast_ref::<T>()
                .unwrap_or_else(|| panic!("option {id:?} does not store a {}", type_name::<T>())),
        )
    }
}

impl<O: OptionId> fmt::Debug for OptionMap<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.slots.keys()).finish()
    }
}
