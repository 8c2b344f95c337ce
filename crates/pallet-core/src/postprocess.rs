use crate::types::{Bin, DuplicateDimensionWarning, ItemType, Placement};

/// Offset that centers the bounding box of `placements` on the bin.
///
/// Packed layouts start at the origin, where this reduces to
/// `((W - max_x) / 2, (L - max_y) / 2)`. A centered layout gets `(0, 0)`.
pub fn centering_offset(placements: &[Placement], bin: &Bin) -> (f64, f64) {
    let Some(first) = placements.first() else {
        return (0.0, 0.0);
    };

    let mut min_x = first.x;
    let mut min_y = first.y;
    let mut max_x = first.x + first.width;
    let mut max_y = first.y + first.height;

    for p in &placements[1..] {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x + p.width);
        max_y = max_y.max(p.y + p.height);
    }

    (
        (bin.width - min_x - max_x) / 2.0,
        (bin.length - min_y - max_y) / 2.0,
    )
}

/// Translates `placements` so the layout sits in the middle of the bin.
pub fn center(placements: &mut [Placement], bin: &Bin) -> (f64, f64) {
    let (dx, dy) = centering_offset(placements, bin);
    for p in placements.iter_mut() {
        p.x += dx;
        p.y += dy;
    }
    (dx, dy)
}

/// First pair of item types with the same size, orientation ignored.
///
/// Pairs are ranked by the later type's position, then the earlier one's.
pub fn find_duplicate_dimensions(items: &[ItemType]) -> Option<DuplicateDimensionWarning> {
    let size = |item: &ItemType| {
        (
            item.width.min(item.length),
            item.width.max(item.length),
        )
    };

    items.iter().enumerate().find_map(|(j, later)| {
        items[..j]
            .iter()
            .find(|earlier| size(*earlier) == size(later))
            .map(|earlier| DuplicateDimensionWarning {
                rid_a: earlier.rid.clone(),
                rid_b: later.rid.clone(),
            })
    })
}
