use crate::geometry::Rect;

/// Returned by [`FreeSpaceManager::insert`] when the occupied rectangle is not
/// fully inside any free region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("rectangle does not lie inside any free region")]
pub struct NoFit;

/// A free region that can host a candidate rectangle at its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fit<S> {
    pub region: Rect,
    pub score: S,
}

/// Maximal-rectangles bookkeeping of the unoccupied area of one bin.
///
/// Free regions may overlap each other but none is contained in another.
#[derive(Debug, Clone)]
pub struct FreeSpaceManager {
    bin: Rect,
    free: Vec<Rect>,
}

impl FreeSpaceManager {
    pub fn new(width: f64, height: f64) -> Self {
        let bin = Rect::new(0.0, 0.0, width, height);
        Self {
            bin,
            free: vec![bin],
        }
    }

    pub fn bin(&self) -> &Rect {
        &self.bin
    }

    pub fn free_regions(&self) -> &[Rect] {
        &self.free
    }

    /// Marks `occupied` as used and recomputes the maximal free regions.
    pub fn insert(&mut self, occupied: &Rect) -> Result<(), NoFit> {
        if occupied.is_degenerate() || !self.free.iter().any(|f| f.contains(occupied)) {
            return Err(NoFit);
        }

        let mut candidates = Vec::with_capacity(self.free.len() + 4);

        for region in self.free.drain(..) {
            if !region.overlaps(occupied) {
                candidates.push(region);
                continue;
            }

            if occupied.x > region.x {
                candidates.push(Rect::new(
                    region.x,
                    region.y,
                    occupied.x - region.x,
                    region.height,
                ));
            }

            if occupied.right() < region.right() {
                candidates.push(Rect::new(
                    occupied.right(),
                    region.y,
                    region.right() - occupied.right(),
                    region.height,
                ));
            }

            if occupied.y > region.y {
                candidates.push(Rect::new(
                    region.x,
                    region.y,
                    region.width,
                    occupied.y - region.y,
                ));
            }

            if occupied.bottom() < region.bottom() {
                candidates.push(Rect::new(
                    region.x,
                    occupied.bottom(),
                    region.width,
                    region.bottom() - occupied.bottom(),
                ));
            }
        }

        self.free = prune(candidates);
        Ok(())
    }

    /// Scores every free region able to host `width x height` at its top-left
    /// corner and returns the lowest score. The first region wins ties.
    pub fn best_score<S, F>(&self, width: f64, height: f64, score: F) -> Option<Fit<S>>
    where
        S: PartialOrd,
        F: Fn(&Rect, f64, f64) -> S,
    {
        let mut best: Option<Fit<S>> = None;

        for region in &self.free {
            if !region.fits(width, height) {
                continue;
            }

            let candidate = score(region, width, height);
            let better = best
                .as_ref()
                .map_or(true, |current| candidate < current.score);
            if better {
                best = Some(Fit {
                    region: *region,
                    score: candidate,
                });
            }
        }

        best
    }

    pub fn free_area(&self) -> f64 {
        self.free.iter().map(Rect::area).sum()
    }
}

/// Drops degenerate regions and regions contained in another one.
/// Of two identical regions the earlier is kept.
fn prune(regions: Vec<Rect>) -> Vec<Rect> {
    let regions: Vec<Rect> = regions.into_iter().filter(|r| !r.is_degenerate()).collect();
    let mut keep = vec![true; regions.len()];

    for i in 0..regions.len() {
        if !keep[i] {
            continue;
        }
        for j in (i + 1)..regions.len() {
            if !keep[j] {
                continue;
            }
            if regions[i].contains(&regions[j]) {
                keep[j] = false;
            } else if regions[j].contains(&regions[i]) {
                keep[i] = false;
                break;
            }
        }
    }

    regions
        .into_iter()
        .zip(keep)
        .filter_map(|(region, kept)| kept.then_some(region))
        .collect()
}
