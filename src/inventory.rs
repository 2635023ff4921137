use serde::{Deserialize, Serialize};
use tracing::info;

use crate::access::requires;
use crate::error::{DeskError, DeskResult};
use crate::models::{new_id, InventoryCategory, InventoryItem, UserRole};
use crate::session::Session;

/// Reorder threshold given to newly registered items.
pub const DEFAULT_MIN_THRESHOLD: u32 = 5;
pub const DEFAULT_UNIT: &str = "개";

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Inventory {
    #[serde(default)]
    pub items: Vec<InventoryItem>,
}

impl Inventory {
    pub fn new(items: Vec<InventoryItem>) -> Inventory {
        Inventory { items }
    }

    pub fn add_item(
        &mut self,
        name: &str,
        category: InventoryCategory,
        quantity: u32,
        unit: Option<&str>,
        session: &Session,
    ) -> DeskResult<&InventoryItem> {
        requires(session, UserRole::Admin, "manage inventory")?;
        let name = name.trim();
        if name.is_empty() {
            return Err(DeskError::validation("item name must not be empty"));
        }
        let unit = unit.map(str::trim).filter(|u| !u.is_empty()).unwrap_or(DEFAULT_UNIT);
        let item = InventoryItem {
            id: new_id(),
            name: name.to_string(),
            category,
            quantity,
            unit: unit.to_string(),
            min_threshold: DEFAULT_MIN_THRESHOLD,
        };
        info!(id = %item.id, quantity, "inventory item added");
        self.items.push(item);
        Ok(&self.items[self.items.len() - 1])
    }

    /// Counts stock up or down; the quantity never drops below zero.
    pub fn adjust_quantity(&mut self, id: &str, delta: i64) -> DeskResult<u32> {
        let item = self
            .items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| DeskError::not_found("Item", id))?;
        let next = (item.quantity as i64).saturating_add(delta).clamp(0, u32::MAX as i64);
        item.quantity = next as u32;
        info!(id, quantity = item.quantity, "inventory quantity adjusted");
        Ok(item.quantity)
    }

    pub fn delete_item(&mut self, id: &str, session: &Session) -> DeskResult<InventoryItem> {
        requires(session, UserRole::Admin, "manage inventory")?;
        let idx = self
            .items
            .iter()
            .position(|i| i.id == id)
            .ok_or_else(|| DeskError::not_found("Item", id))?;
        info!(id, "inventory item removed");
        Ok(self.items.remove(idx))
    }

    /// Items in `category` (or all) whose name contains `search`, ignoring case.
    pub fn filtered(&self, category: Option<InventoryCategory>, search: &str) -> Vec<&InventoryItem> {
        let needle = search.to_lowercase();
        self.items
            .iter()
            .filter(|i| category.map_or(true, |c| i.category == c))
            .filter(|i| i.name.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn low_stock_count(&self) -> usize {
        self.items.iter().filter(|i| i.is_low()).count()
    }
}

pub fn default_items() -> Vec<InventoryItem> {
    [
        ("1", "샴푸 (대용량)", InventoryCategory::Consumable, 12, "개", 5),
        ("2", "칫솔 (일회용)", InventoryCategory::Disposable, 4, "박스", 10),
        ("3", "수건 (중형)", InventoryCategory::Equipment, 150, "장", 50),
        ("4", "바디워시", InventoryCategory::Consumable, 2, "개", 8),
        ("5", "면도기", InventoryCategory::Disposable, 20, "개", 15),
    ]
    .into_iter()
    .map(|(id, name, category, quantity, unit, min_threshold)| InventoryItem {
        id: id.into(),
        name: name.into(),
        category,
        quantity,
        unit: unit.into(),
        min_threshold,
    })
    .collect()
}
