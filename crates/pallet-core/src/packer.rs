use crate::cancel::CancelToken;
use crate::geometry::Rect;
use crate::heuristic::PlacementHeuristic;
use crate::maxrects::FreeSpaceManager;
use crate::supply::SupplyItem;
use crate::types::{Bin, Result};
use tracing::{trace, warn};

/// Placements between two cancellation checks.
const CANCEL_CHECK_INTERVAL: usize = 64;

/// One committed unit of a packing attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedRect {
    pub rect: Rect,
    pub type_index: usize,
    pub rotated: bool,
}

/// Every unit placed by one attempt, in placement order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PackingResult {
    pub placements: Vec<PlacedRect>,
}

impl PackingResult {
    pub fn placed(&self) -> usize {
        self.placements.len()
    }

    /// Placed units per item type.
    pub fn counts(&self, type_count: usize) -> Vec<u32> {
        let mut counts = vec![0; type_count];
        for placed in &self.placements {
            counts[placed.type_index] += 1;
        }
        counts
    }
}

/// Packs a stream of supply units into a single bin with one heuristic.
pub struct Packer<'a> {
    bin: &'a Bin,
    heuristic: PlacementHeuristic,
    allow_rotation: bool,
    cancel: Option<&'a CancelToken>,
}

impl<'a> Packer<'a> {
    pub fn new(bin: &'a Bin, heuristic: PlacementHeuristic, allow_rotation: bool) -> Self {
        Self {
            bin,
            heuristic,
            allow_rotation,
            cancel: None,
        }
    }

    pub fn with_cancel(mut self, cancel: &'a CancelToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Offers every unit in order. Units that fit nowhere are skipped.
    pub fn pack(&self, supply: &[SupplyItem]) -> Result<PackingResult> {
        let mut space = FreeSpaceManager::new(self.bin.width, self.bin.length);
        let mut result = PackingResult::default();

        for (index, unit) in supply.iter().enumerate() {
            if index % CANCEL_CHECK_INTERVAL == 0 {
                if let Some(cancel) = self.cancel {
                    cancel.check()?;
                }
            }

            let Some(candidate) = self.heuristic.find_position(
                &space,
                unit.width,
                unit.length,
                self.allow_rotation,
            ) else {
                trace!(
                    "{}: unit {} of type {} does not fit",
                    self.heuristic,
                    index,
                    unit.type_index
                );
                continue;
            };

            if let Err(err) = space.insert(&candidate.rect) {
                warn!(
                    "{}: dropping unit {} of type {} at {:?}: {}",
                    self.heuristic, index, unit.type_index, candidate.rect, err
                );
                continue;
            }

            result.placements.push(PlacedRect {
                rect: candidate.rect,
                type_index: unit.type_index,
                rotated: candidate.rotated,
            });
        }

        Ok(result)
    }
}
