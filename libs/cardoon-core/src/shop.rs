//! Shop items and the gold multiplier of equipped items.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// What an item does once equipped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemEffect {
    GoldMultiplier { factor: f64 },
    Cosmetic,
}

/// An item offered in the shop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub effect: ItemEffect,
}

/// An item owned by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserItem {
    pub item: Item,
    pub equipped: bool,
}

/// Shop listing entry: either still for sale or already owned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShopEntry {
    Item(Item),
    UserItem(UserItem),
}

impl ShopEntry {
    pub fn item(&self) -> &Item {
        match self {
            Self::Item(item) => item,
            Self::UserItem(owned) => &owned.item,
        }
    }

    pub fn is_owned(&self) -> bool {
        match self {
            Self::Item(_) => false,
            Self::UserItem(_) => true,
        }
    }
}

/// Combined gold multiplier of the equipped items, 1.0 when none apply.
pub fn gold_multiplier(items: &[UserItem]) -> f64 {
    items
        .iter()
        .filter(|owned| owned.equipped)
        .map(|owned| match owned.item.effect {
            ItemEffect::GoldMultiplier { factor } => factor.max(0.0),
            ItemEffect::Cosmetic => 1.0,
        })
        .product()
}

/// Merge the shop catalog with a user's inventory, in catalog order.
pub fn shop_listing(catalog: &[Item], owned: &[UserItem]) -> Vec<ShopEntry> {
    catalog
        .iter()
        .map(|item| match owned.iter().find(|o| o.item.id == item.id) {
            Some(user_item) => ShopEntry::UserItem(user_item.clone()),
            None => ShopEntry::Item(item.clone()),
        })
        .collect()
}

/// Buy `item`, deducting its price from `gold`.
pub fn buy(item: &Item, gold: &mut f64, owned: &[UserItem]) -> Result<UserItem> {
    if owned.iter().any(|o| o.item.id == item.id) {
        return Err(CoreError::validation(format!("item {} already owned", item.id)));
    }
    if *gold < item.price {
        return Err(CoreError::validation(format!(
            "item {} costs {} but only {} gold available",
            item.id, item.price, gold
        )));
    }
    *gold -= item.price;
    Ok(UserItem {
        item: item.clone(),
        equipped: false,
    })
}
