use serde::{Deserialize, Serialize};

/// A stocked inventory item.
///
/// `quantity` counts the units currently available for borrowing, not the
/// total ever stocked: borrowing takes one, returning puts one back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    /// Unique key. Older stores used `item_id`; the alias keeps those
    /// files loadable.
    #[serde(alias = "item_id")]
    pub resource_id: String,
    /// Display name.
    pub name: String,
    /// Category, stored under the historical `type` key (`rtype` in the
    /// oldest files).
    #[serde(rename = "type", alias = "rtype")]
    pub category: String,
    /// Units currently available.
    pub quantity: u32,
}

impl Resource {
    /// Whether at least one unit can be borrowed.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.quantity > 0
    }

    /// Takes one unit for a borrow. Returns `false` when none are left.
    pub const fn take_one(&mut self) -> bool {
        if self.quantity == 0 {
            return false;
        }
        self.quantity -= 1;
        true
    }

    /// Puts one unit back after a return.
    pub const fn put_back_one(&mut self) {
        self.quantity += 1;
    }
}
