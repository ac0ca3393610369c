//! GearSource - Stats from an equipped item slot

use crate::source::StatSource;
use crate::stat_block::{StatAccumulator, StatBlock};
use crate::types::EquipmentSlot;

/// Stats granted by whatever occupies one equipment slot
pub struct GearSource<'a> {
    pub slot: EquipmentSlot,
    pub stats: &'a StatBlock,
}

impl<'a> GearSource<'a> {
    pub fn new(slot: EquipmentSlot, stats: &'a StatBlock) -> Self {
        GearSource { slot, stats }
    }
}

impl StatSource for GearSource<'_> {
    fn id(&self) -> &str {
        match self.slot {
            EquipmentSlot::Weapon => "gear_weapon",
            EquipmentSlot::Offhand => "gear_offhand",
            EquipmentSlot::Head => "gear_head",
            EquipmentSlot::Body => "gear_body",
            EquipmentSlot::Hands => "gear_hands",
            EquipmentSlot::Legs => "gear_legs",
            EquipmentSlot::Feet => "gear_feet",
            EquipmentSlot::Cape => "gear_cape",
            EquipmentSlot::Amulet => "gear_amulet",
            EquipmentSlot::Ring => "gear_ring",
        }
    }

    fn apply(&self, stats: &mut StatAccumulator) {
        stats.add_block(self.stats);
    }
}
