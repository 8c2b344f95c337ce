use super::*;
use crate::postprocess;

impl Tournament {
    /// Turns the winning attempt into the centered, annotated report.
    pub(super) fn build_report(
        &self,
        winner: Attempt,
        duplicate: Option<DuplicateDimensionWarning>,
    ) -> PackReport {
        let items = &self.request.items;
        let mut placements: Vec<Placement> = winner
            .result
            .placements
            .iter()
            .map(|placed| Placement {
                rid: items[placed.type_index].rid.clone(),
                x: placed.rect.x,
                y: placed.rect.y,
                width: placed.rect.width,
                height: placed.rect.height,
                rotated: placed.rotated,
            })
            .collect();

        let (dx, dy) = postprocess::center(&mut placements, &self.request.bin);
        debug!("Centered layout by ({dx}, {dy})");

        let soft_shortfalls = self.shortfalls(&winner.counts, false);
        for shortfall in &soft_shortfalls {
            warn!(
                "Only packed {} of {} required for {}",
                shortfall.placed, shortfall.required, shortfall.rid
            );
        }

        let breakdown = self.breakdown(&winner.result);
        let summary = self.calculate_summary(&placements);

        PackReport {
            bin: self.request.bin,
            total_placed: placements.len(),
            placements,
            winning_combo: WinningCombo {
                heuristic_name: winner.heuristic.name().to_string(),
                order_strategy_name: winner.order.name().to_string(),
            },
            soft_shortfalls,
            duplicate_dimension_warning: duplicate,
            breakdown,
            summary,
        }
    }

    /// Placed units per item type, split by orientation. Types with no units
    /// placed are left out.
    pub(super) fn breakdown(&self, result: &PackingResult) -> Vec<TypeBreakdown> {
        let mut standard = vec![0u32; self.request.items.len()];
        let mut rotated = vec![0u32; self.request.items.len()];

        for placed in &result.placements {
            if placed.rotated {
                rotated[placed.type_index] += 1;
            } else {
                standard[placed.type_index] += 1;
            }
        }

        self.request
            .items
            .iter()
            .enumerate()
            .filter(|(i, _)| standard[*i] + rotated[*i] > 0)
            .map(|(i, item)| TypeBreakdown {
                rid: item.rid.clone(),
                total: standard[i] + rotated[i],
                standard: standard[i],
                rotated: rotated[i],
            })
            .collect()
    }

    /// Computes used and wasted bin area.
    pub(super) fn calculate_summary(&self, placements: &[Placement]) -> Summary {
        let bin_area = self.request.bin.area();
        let used_area: f64 = placements.iter().map(|p| p.width * p.height).sum();
        let waste_area = bin_area - used_area;
        let waste_percentage = if bin_area > 0.0 {
            (waste_area / bin_area) * 100.0
        } else {
            0.0
        };

        Summary {
            bin_area,
            used_area,
            waste_area,
            waste_percentage,
        }
    }
}
