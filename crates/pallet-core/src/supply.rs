use crate::types::{Bin, ItemType, SupplyCap};

/// One unit offered to the packer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SupplyItem {
    /// Index of the item type in the request
    pub type_index: usize,
    pub width: f64,
    pub length: f64,
}

/// Expands item types, visited in `order`, into individual units.
pub fn expand(items: &[ItemType], order: &[usize], bin: &Bin, cap: SupplyCap) -> Vec<SupplyItem> {
    let mut supply = Vec::new();
    for &type_index in order {
        let item = &items[type_index];
        let units = cap.units(bin, item) as usize;
        let unit = SupplyItem {
            type_index,
            width: item.width,
            length: item.length,
        };
        supply.extend(std::iter::repeat(unit).take(units));
    }
    supply
}
