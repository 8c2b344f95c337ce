use crate::types::ItemType;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Order in which item types are offered to the packer.
///
/// Priority item types always come first. Within each class, sorting
/// strategies are stable descending sorts, so equal keys keep declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStrategy {
    /// Declaration order.
    #[serde(alias = "prioritized_list")]
    AsGiven,
    #[serde(alias = "area")]
    ByArea,
    #[serde(alias = "long_side")]
    ByLongSide,
    #[serde(alias = "short_side")]
    ByShortSide,
    #[serde(alias = "perimeter")]
    ByPerimeter,
}

impl OrderStrategy {
    pub const ALL: [OrderStrategy; 5] = [
        OrderStrategy::AsGiven,
        OrderStrategy::ByArea,
        OrderStrategy::ByLongSide,
        OrderStrategy::ByShortSide,
        OrderStrategy::ByPerimeter,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            OrderStrategy::AsGiven => "Prioritized List",
            OrderStrategy::ByArea => "AREA",
            OrderStrategy::ByLongSide => "LSIDE",
            OrderStrategy::ByShortSide => "SSIDE",
            OrderStrategy::ByPerimeter => "PERI",
        }
    }

    fn key(&self, item: &ItemType) -> f64 {
        match self {
            OrderStrategy::AsGiven => 0.0,
            OrderStrategy::ByArea => item.width * item.length,
            OrderStrategy::ByLongSide => item.width.max(item.length),
            OrderStrategy::ByShortSide => item.width.min(item.length),
            OrderStrategy::ByPerimeter => 2.0 * (item.width + item.length),
        }
    }

    /// Returns indices into `items` in packing order.
    pub fn arrange(&self, items: &[ItemType]) -> Vec<usize> {
        let (mut priority, mut rest): (Vec<usize>, Vec<usize>) =
            (0..items.len()).partition(|&i| items[i].priority);

        if *self != OrderStrategy::AsGiven {
            let by_key_desc = |a: &usize, b: &usize| {
                let key_a = self.key(&items[*a]);
                let key_b = self.key(&items[*b]);
                key_b.partial_cmp(&key_a).unwrap_or(Ordering::Equal)
            };
            priority.sort_by(by_key_desc);
            rest.sort_by(by_key_desc);
        }

        priority.extend(rest);
        priority
    }

    /// Strategies to run when the request does not name any: only
    /// [`OrderStrategy::AsGiven`] if a priority class exists, every strategy otherwise.
    pub fn auto(items: &[ItemType]) -> Vec<Self> {
        if items.iter().any(|item| item.priority) {
            vec![OrderStrategy::AsGiven]
        } else {
            Self::ALL.to_vec()
        }
    }

    /// Resolves a requested list: drops duplicates and makes sure
    /// [`OrderStrategy::AsGiven`] runs first.
    pub fn resolve(requested: Option<&[OrderStrategy]>, items: &[ItemType]) -> Vec<Self> {
        let Some(requested) = requested else {
            return Self::auto(items);
        };

        let mut resolved = vec![OrderStrategy::AsGiven];
        for strategy in requested {
            if !resolved.contains(strategy) {
                resolved.push(*strategy);
            }
        }
        resolved
    }
}

impl std::fmt::Display for OrderStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
