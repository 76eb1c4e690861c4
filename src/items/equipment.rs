use super::types::{EquipmentSlot, Item};
use crate::core::error::{DungeonError, DungeonResult};
use serde::{Deserialize, Serialize};

/// A hero's three equipment slots.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    pub weapon: Option<Item>,
    pub armor: Option<Item>,
    pub accessory: Option<Item>,
}

impl Equipment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: EquipmentSlot) -> Option<&Item> {
        match slot {
            EquipmentSlot::Weapon => self.weapon.as_ref(),
            EquipmentSlot::Armor => self.armor.as_ref(),
            EquipmentSlot::Accessory => self.accessory.as_ref(),
        }
    }

    fn slot_mut(&mut self, slot: EquipmentSlot) -> &mut Option<Item> {
        match slot {
            EquipmentSlot::Weapon => &mut self.weapon,
            EquipmentSlot::Armor => &mut self.armor,
            EquipmentSlot::Accessory => &mut self.accessory,
        }
    }

    /// Puts `item` into its slot, handing back whatever was there.
    ///
    /// On error the item comes back alongside the error and the equipment is
    /// unchanged.
    pub fn equip(&mut self, item: Item) -> Result<Option<Item>, (DungeonError, Item)> {
        match item.item_type.slot() {
            Some(slot) => Ok(self.slot_mut(slot).replace(item)),
            None => Err((DungeonError::SystemWideOnly, item)),
        }
    }

    /// Empties a slot. Fails if nothing is equipped there.
    pub fn unequip(&mut self, slot: EquipmentSlot) -> DungeonResult<Item> {
        self.slot_mut(slot).take().ok_or(DungeonError::InvalidSlot)
    }

    /// Equipped items in slot order: weapon, armor, accessory.
    pub fn iter_equipped(&self) -> impl Iterator<Item = &Item> {
        [&self.weapon, &self.armor, &self.accessory]
            .into_iter()
            .filter_map(|item| item.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::types::{ItemType, Rarity};

    fn create_test_item(item_type: ItemType) -> Item {
        Item::new("Test Item", item_type, Rarity::Common, 1).with_bonus("atk", 3.0)
    }

    #[test]
    fn test_equipment_starts_empty() {
        let eq = Equipment::new();
        assert_eq!(eq.iter_equipped().count(), 0);
        for slot in EquipmentSlot::all() {
            assert!(eq.get(slot).is_none());
        }
    }

    #[test]
    fn test_equip_into_matching_slot() {
        let mut eq = Equipment::new();
        let armor = create_test_item(ItemType::Armor);
        let previous = eq.equip(armor.clone()).unwrap();
        assert!(previous.is_none());
        assert_eq!(eq.get(EquipmentSlot::Armor), Some(&armor));
        assert!(eq.get(EquipmentSlot::Weapon).is_none());
    }

    #[test]
    fn test_equip_returns_replaced_item() {
        let mut eq = Equipment::new();
        let first = create_test_item(ItemType::Weapon);
        let second = create_test_item(ItemType::Weapon);
        eq.equip(first.clone()).unwrap();
        let replaced = eq.equip(second.clone()).unwrap();
        assert_eq!(replaced, Some(first));
        assert_eq!(eq.get(EquipmentSlot::Weapon), Some(&second));
        assert_eq!(eq.iter_equipped().count(), 1);
    }

    #[test]
    fn test_system_wide_rejected() {
        let mut eq = Equipment::new();
        let soulware = create_test_item(ItemType::SystemWide);
        let (err, returned) = eq.equip(soulware.clone()).unwrap_err();
        assert_eq!(err, DungeonError::SystemWideOnly);
        assert_eq!(returned, soulware);
        assert_eq!(eq.iter_equipped().count(), 0);
    }

    #[test]
    fn test_unequip_empty_slot_fails() {
        let mut eq = Equipment::new();
        assert_eq!(
            eq.unequip(EquipmentSlot::Accessory),
            Err(DungeonError::InvalidSlot)
        );
    }

    #[test]
    fn test_unequip_moves_item_out() {
        let mut eq = Equipment::new();
        let ring = create_test_item(ItemType::Accessory);
        eq.equip(ring.clone()).unwrap();
        assert_eq!(eq.unequip(EquipmentSlot::Accessory), Ok(ring));
        assert!(eq.get(EquipmentSlot::Accessory).is_none());
    }

    #[test]
    fn test_iter_equipped_slot_order() {
        let mut eq = Equipment::new();
        eq.equip(create_test_item(ItemType::Accessory)).unwrap();
        eq.equip(create_test_item(ItemType::Weapon)).unwrap();
        let types: Vec<ItemType> = eq.iter_equipped().map(|i| i.item_type).collect();
        assert_eq!(types, vec![ItemType::Weapon, ItemType::Accessory]);
    }
}
