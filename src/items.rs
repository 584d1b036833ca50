//! Single-stack cargo carried by units.
//!
//! An [`ItemSlot`] is a plain field; the operations on it are free functions
//! taking the carrier's current capacity. Entities expose their slot and
//! capacity through [`CargoCarrier`], which provides the operations as
//! default methods.

use hecs::World;

/// Item types a unit can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Item {
    Copper,
    Lead,
    Graphite,
    Silicon,
    Titanium,
    Thorium,
    Scrap,
}

impl Item {
    pub fn name(&self) -> &'static str {
        match self {
            Item::Copper => "copper",
            Item::Lead => "lead",
            Item::Graphite => "graphite",
            Item::Silicon => "silicon",
            Item::Titanium => "titanium",
            Item::Thorium => "thorium",
            Item::Scrap => "scrap",
        }
    }
}

/// One `(item, amount)` pair. `item` is only meaningful while `amount > 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ItemSlot {
    pub item: Option<Item>,
    pub amount: i32,
}

/// Clamp to `[0, capacity]`; a negative capacity yields 0 instead of panicking.
fn clamp_to_capacity(amount: i32, capacity: i32) -> i32 {
    amount.min(capacity).max(0)
}

pub fn has_item(slot: &ItemSlot) -> bool {
    slot.amount > 0
}

/// True if the slot is empty, or holds `item` with room for one more unit.
pub fn accepts_item(slot: &ItemSlot, capacity: i32, item: Item) -> bool {
    !has_item(slot) || (slot.item == Some(item) && slot.amount < capacity)
}

/// Add `amount` of `item`. A different item replaces the stack instead of merging.
pub fn add_item(slot: &mut ItemSlot, capacity: i32, item: Item, amount: i32) {
    let total = if slot.item == Some(item) {
        slot.amount.saturating_add(amount)
    } else {
        amount
    };
    slot.item = Some(item);
    slot.amount = clamp_to_capacity(total, capacity);
}

/// How many units of `item` the slot could still take.
pub fn max_accepted(slot: &ItemSlot, capacity: i32, item: Item) -> i32 {
    if slot.item != Some(item) && slot.amount > 0 {
        0
    } else {
        capacity.saturating_sub(slot.amount)
    }
}

/// Empty the slot. The item type is left in place.
pub fn clear_item(slot: &mut ItemSlot) {
    slot.amount = 0;
}

/// Per-tick re-clamp, for carriers whose capacity changed.
pub fn clamp_slot(slot: &mut ItemSlot, capacity: i32) {
    slot.amount = clamp_to_capacity(slot.amount, capacity);
}

/// Anything that carries a single item stack.
pub trait CargoCarrier {
    fn item_capacity(&self) -> i32;
    fn slot(&self) -> &ItemSlot;
    fn slot_mut(&mut self) -> &mut ItemSlot;

    fn item(&self) -> Option<Item> {
        self.slot().item
    }

    fn has_item(&self) -> bool {
        has_item(self.slot())
    }

    fn accepts_item(&self, item: Item) -> bool {
        accepts_item(self.slot(), self.item_capacity(), item)
    }

    fn add_item(&mut self, item: Item) {
        self.add_items(item, 1);
    }

    fn add_items(&mut self, item: Item, amount: i32) {
        let capacity = self.item_capacity();
        add_item(self.slot_mut(), capacity, item, amount);
    }

    fn max_accepted(&self, item: Item) -> i32 {
        max_accepted(self.slot(), self.item_capacity(), item)
    }

    fn clear_item(&mut self) {
        clear_item(self.slot_mut());
    }

    fn update_items(&mut self) {
        let capacity = self.item_capacity();
        clamp_slot(self.slot_mut(), capacity);
    }
}

/// Cargo component for units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cargo {
    pub slot: ItemSlot,
    pub capacity: i32,
}

impl Cargo {
    pub fn new(capacity: i32) -> Self {
        Self {
            slot: ItemSlot::default(),
            capacity,
        }
    }
}

impl CargoCarrier for Cargo {
    fn item_capacity(&self) -> i32 {
        self.capacity
    }

    fn slot(&self) -> &ItemSlot {
        &self.slot
    }

    fn slot_mut(&mut self) -> &mut ItemSlot {
        &mut self.slot
    }
}

/// Re-clamp every carrier of type `C` in the world.
pub fn update_carriers<C: CargoCarrier + hecs::Component>(world: &mut World) {
    puffin::profile_function!();
    for (_, carrier) in world.query_mut::<&mut C>() {
        carrier.update_items();
    }
}
