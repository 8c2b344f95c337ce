use crate::cancel::CancelToken;
use crate::heuristic::PlacementHeuristic;
use crate::order::OrderStrategy;
use crate::packer::{Packer, PackingResult};
use crate::postprocess::find_duplicate_dimensions;
use crate::supply::{self, SupplyItem};
use crate::types::*;
use rayon::prelude::*;
use std::collections::HashSet;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

mod summary;
#[cfg(test)]
mod tests;

/// Label given to the item type at `index` when the request leaves it empty:
/// "Box A" .. "Box Z", then "Box AA", "Box AB", ...
pub fn default_label(index: usize) -> String {
    let mut letters = Vec::new();
    let mut n = index + 1;
    while n > 0 {
        n -= 1;
        letters.push(char::from(b'A' + (n % 26) as u8));
        n /= 26;
    }
    letters.reverse();
    format!("Box {}", letters.into_iter().collect::<String>())
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Outcome of one heuristic / order strategy combination.
struct Attempt {
    heuristic: PlacementHeuristic,
    order: OrderStrategy,
    result: PackingResult,
    counts: Vec<u32>,
}

/// Runs every heuristic / order strategy combination and keeps the layout
/// with the most units among those meeting all priority quantities.
///
/// Combinations are ranked heuristic-major in request order. On equal unit
/// counts the earlier combination wins.
pub struct Tournament {
    request: PackRequest,
    order_strategies: Vec<OrderStrategy>,
    cancel: CancelToken,
}

impl Tournament {
    /// Validates the request and fills in missing labels.
    pub fn new(mut request: PackRequest) -> Result<Self> {
        if request.items.is_empty() {
            return Err(PackError::InvalidInput(
                "At least one item type must be provided".to_string(),
            ));
        }

        if !is_positive(request.bin.width) || !is_positive(request.bin.length) {
            return Err(PackError::InvalidInput(format!(
                "Bin dimensions must be positive, got {} x {}",
                request.bin.width, request.bin.length
            )));
        }

        if request.heuristics.is_empty() {
            return Err(PackError::InvalidInput(
                "At least one placement heuristic must be provided".to_string(),
            ));
        }

        if request.supply_cap == SupplyCap::Fixed(0) {
            return Err(PackError::InvalidInput(
                "Supply cap must be positive".to_string(),
            ));
        }

        for (index, item) in request.items.iter_mut().enumerate() {
            if item.rid.trim().is_empty() {
                item.rid = default_label(index);
            }

            if !is_positive(item.width) || !is_positive(item.length) {
                return Err(PackError::InvalidInput(format!(
                    "Item '{}' must have positive width and length",
                    item.rid
                )));
            }

            if item.required_quantity == Some(0) {
                return Err(PackError::InvalidInput(format!(
                    "Item '{}' has a required quantity of zero",
                    item.rid
                )));
            }
        }

        let mut seen = HashSet::new();
        for item in &request.items {
            if !seen.insert(item.rid.as_str()) {
                return Err(PackError::InvalidInput(format!(
                    "Duplicate item label '{}'",
                    item.rid
                )));
            }
        }

        let mut heuristics = Vec::with_capacity(request.heuristics.len());
        for heuristic in &request.heuristics {
            if !heuristics.contains(heuristic) {
                heuristics.push(*heuristic);
            }
        }
        request.heuristics = heuristics;

        let order_strategies =
            OrderStrategy::resolve(request.order_strategies.as_deref(), &request.items);

        Ok(Self {
            request,
            order_strategies,
            cancel: CancelToken::new(),
        })
    }

    /// Lets the caller stop the run through a clone of `cancel`.
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// The validated request, labels filled in.
    pub fn request(&self) -> &PackRequest {
        &self.request
    }

    pub fn order_strategies(&self) -> &[OrderStrategy] {
        &self.order_strategies
    }

    /// Every combination in ranking order.
    pub fn combinations(&self) -> Vec<(PlacementHeuristic, OrderStrategy)> {
        self.request
            .heuristics
            .iter()
            .flat_map(|h| self.order_strategies.iter().map(move |o| (*h, *o)))
            .collect()
    }

    /// Runs the whole tournament.
    pub fn run(&self) -> Result<PackOutcome> {
        let started = Instant::now();
        let cancel = match self.request.time_limit_ms {
            Some(ms) => self.cancel.with_time_limit(Duration::from_millis(ms)),
            None => self.cancel.clone(),
        };

        let items = &self.request.items;
        let duplicate = find_duplicate_dimensions(items);
        if let Some(dup) = &duplicate {
            warn!(
                "Item types '{}' and '{}' have the same dimensions, per-type counts may be ambiguous",
                dup.rid_a, dup.rid_b
            );
        }

        let supplies: Vec<(OrderStrategy, Vec<SupplyItem>)> = self
            .order_strategies
            .iter()
            .map(|order| {
                let arranged = order.arrange(items);
                let units =
                    supply::expand(items, &arranged, &self.request.bin, self.request.supply_cap);
                (*order, units)
            })
            .collect();

        let jobs: Vec<(PlacementHeuristic, &(OrderStrategy, Vec<SupplyItem>))> = self
            .request
            .heuristics
            .iter()
            .flat_map(|h| supplies.iter().map(move |s| (*h, s)))
            .collect();

        info!(
            "Running {} combinations over {} item types",
            jobs.len(),
            items.len()
        );

        let attempts: Vec<Attempt> = if self.request.parallel {
            jobs.par_iter()
                .map(|(heuristic, (order, units))| self.attempt(*heuristic, *order, units, &cancel))
                .collect::<Result<Vec<_>>>()?
        } else {
            jobs.iter()
                .map(|(heuristic, (order, units))| self.attempt(*heuristic, *order, units, &cancel))
                .collect::<Result<Vec<_>>>()?
        };

        // reduce in job order, whatever order the threads finished in
        let mut best: Option<Attempt> = None;
        let mut closest: Option<(u64, Attempt)> = None;

        for attempt in attempts {
            let deficit = self.priority_deficit(&attempt.counts);
            debug!(
                "{} / {}: {} placed, priority deficit {}",
                attempt.heuristic,
                attempt.order,
                attempt.result.placed(),
                deficit
            );

            if deficit > 0 {
                if closest.as_ref().map_or(true, |(d, _)| deficit < *d) {
                    closest = Some((deficit, attempt));
                }
                continue;
            }

            let better = best
                .as_ref()
                .map_or(true, |b| attempt.result.placed() > b.result.placed());
            if better {
                best = Some(attempt);
            }
        }

        let Some(winner) = best else {
            let unmet_priority = closest
                .map(|(_, attempt)| self.unmet_priority(&attempt.counts))
                .unwrap_or_default();
            warn!(
                "No combination satisfied the priority quantities ({} types unmet) after {:?}",
                unmet_priority.len(),
                started.elapsed()
            );
            return Ok(PackOutcome::Infeasible(InfeasibleReport {
                error: "Infeasible".to_string(),
                unmet_priority,
                duplicate_dimension_warning: duplicate,
            }));
        };

        info!(
            "Winner {} / {} with {} units after {:?}",
            winner.heuristic,
            winner.order,
            winner.result.placed(),
            started.elapsed()
        );

        Ok(PackOutcome::Packed(self.build_report(winner, duplicate)))
    }

    fn attempt(
        &self,
        heuristic: PlacementHeuristic,
        order: OrderStrategy,
        units: &[SupplyItem],
        cancel: &CancelToken,
    ) -> Result<Attempt> {
        cancel.check()?;

        let result = Packer::new(&self.request.bin, heuristic, self.request.allow_rotation)
            .with_cancel(cancel)
            .pack(units)?;
        let counts = result.counts(self.request.items.len());

        Ok(Attempt {
            heuristic,
            order,
            result,
            counts,
        })
    }

    /// Units missing over all priority types with a required quantity.
    fn priority_deficit(&self, counts: &[u32]) -> u64 {
        self.request
            .items
            .iter()
            .zip(counts)
            .filter(|(item, _)| item.priority)
            .filter_map(|(item, &placed)| {
                item.required_quantity
                    .map(|required| u64::from(required.saturating_sub(placed)))
            })
            .sum()
    }

    fn unmet_priority(&self, counts: &[u32]) -> Vec<Shortfall> {
        self.shortfalls(counts, true)
    }

    /// Required quantities of one class that `counts` falls short of.
    fn shortfalls(&self, counts: &[u32], priority: bool) -> Vec<Shortfall> {
        self.request
            .items
            .iter()
            .zip(counts)
            .filter(|(item, _)| item.priority == priority)
            .filter_map(|(item, &placed)| match item.required_quantity {
                Some(required) if placed < required => Some(Shortfall {
                    rid: item.rid.clone(),
                    required,
                    placed,
                }),
                _ => None,
            })
            .collect()
    }
}
