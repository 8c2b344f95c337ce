use crate::geometry::Rect;
use crate::maxrects::FreeSpaceManager;
use serde::{Deserialize, Serialize};

/// Lower is better. Only bottom-left uses the second key, to order equal `y`
/// by `x`; the other heuristics leave it at zero so equal scores stay ties.
pub type Score = (f64, f64);

/// Rule used to pick the free region that receives the next item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementHeuristic {
    /// Lowest `y`, then lowest `x`.
    #[serde(alias = "bl")]
    BottomLeft,
    /// Smallest leftover on the shorter side.
    #[serde(alias = "bssf")]
    BestShortSideFit,
    /// Smallest leftover area.
    #[serde(alias = "baf")]
    BestAreaFit,
    /// Smallest leftover on the longer side.
    #[serde(alias = "blsf")]
    BestLongSideFit,
}

/// Where an item goes and in which orientation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub rect: Rect,
    pub rotated: bool,
    pub score: Score,
}

impl PlacementHeuristic {
    /// Tournament order. Earlier heuristics win ties.
    pub const ALL: [PlacementHeuristic; 4] = [
        PlacementHeuristic::BottomLeft,
        PlacementHeuristic::BestShortSideFit,
        PlacementHeuristic::BestAreaFit,
        PlacementHeuristic::BestLongSideFit,
    ];

    pub fn all() -> Vec<Self> {
        Self::ALL.to_vec()
    }

    pub fn name(&self) -> &'static str {
        match self {
            PlacementHeuristic::BottomLeft => "MaxRectsBl",
            PlacementHeuristic::BestShortSideFit => "MaxRectsBssf",
            PlacementHeuristic::BestAreaFit => "MaxRectsBaf",
            PlacementHeuristic::BestLongSideFit => "MaxRectsBlsf",
        }
    }

    /// Scores a `width x height` rectangle placed at the top-left corner of `region`.
    pub fn score(&self, region: &Rect, width: f64, height: f64) -> Score {
        let leftover_w = region.width - width;
        let leftover_h = region.height - height;

        match self {
            PlacementHeuristic::BottomLeft => (region.y, region.x),
            PlacementHeuristic::BestShortSideFit => (leftover_w.min(leftover_h), 0.0),
            PlacementHeuristic::BestAreaFit => (region.area() - width * height, 0.0),
            PlacementHeuristic::BestLongSideFit => (leftover_w.max(leftover_h), 0.0),
        }
    }

    /// Picks the best region and orientation for a `width x length` item.
    ///
    /// The rotated orientation is only tried for non-square items when
    /// `allow_rotation` is set, and only wins on a strictly better score.
    pub fn find_position(
        &self,
        space: &FreeSpaceManager,
        width: f64,
        length: f64,
        allow_rotation: bool,
    ) -> Option<Candidate> {
        let score = |region: &Rect, w: f64, h: f64| self.score(region, w, h);

        let standard = space
            .best_score(width, length, score)
            .map(|fit| Candidate {
                rect: Rect::new(fit.region.x, fit.region.y, width, length),
                rotated: false,
                score: fit.score,
            });

        if !allow_rotation || width == length {
            return standard;
        }

        let rotated = space
            .best_score(length, width, score)
            .map(|fit| Candidate {
                rect: Rect::new(fit.region.x, fit.region.y, length, width),
                rotated: true,
                score: fit.score,
            });

        match (standard, rotated) {
            (Some(s), Some(r)) if r.score < s.score => Some(r),
            (Some(s), _) => Some(s),
            (None, r) => r,
        }
    }
}

impl std::fmt::Display for PlacementHeuristic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
