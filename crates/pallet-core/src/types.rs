use crate::heuristic::PlacementHeuristic;
use crate::order::OrderStrategy;
use serde::{Deserialize, Serialize};

/// Units generated for an item type without a required quantity.
pub const DEFAULT_SUPPLY_CAP: u32 = 200;

/// The packing surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bin {
    pub width: f64,
    pub length: f64,
}

impl Bin {
    pub fn area(&self) -> f64 {
        self.width * self.length
    }
}

/// Item type - one box size offered for packing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemType {
    /// Unique label. Left empty, it becomes "Box A", "Box B", ... by position.
    #[serde(default)]
    pub rid: String,
    pub width: f64,
    pub length: f64,
    /// Minimum number of units wanted. `None` packs as many as fit.
    #[serde(default)]
    pub required_quantity: Option<u32>,
    /// Priority types must reach their required quantity for a layout to count
    #[serde(default)]
    pub priority: bool,
}

impl ItemType {
    pub fn is_square(&self) -> bool {
        self.width == self.length
    }
}

/// How many units an item type without a required quantity contributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupplyCap {
    /// Fixed number of units per unbounded type
    Fixed(u32),
    /// As many units as the bin area could hold, at least one
    AreaBound,
}

impl Default for SupplyCap {
    fn default() -> Self {
        SupplyCap::Fixed(DEFAULT_SUPPLY_CAP)
    }
}

impl SupplyCap {
    /// Units to generate for `item` on `bin`.
    ///
    /// Never more than [`SupplyCap::area_bound`]: further units could not be
    /// placed, and shortfalls are measured against the declared quantity.
    pub fn units(&self, bin: &Bin, item: &ItemType) -> u32 {
        let bound = Self::area_bound(bin, item);
        let wanted = match (item.required_quantity, self) {
            (Some(quantity), _) => quantity,
            (None, SupplyCap::Fixed(cap)) => *cap,
            (None, SupplyCap::AreaBound) => bound,
        };
        wanted.min(bound)
    }

    /// Units of `item` whose total area fits in `bin`, at least one.
    pub fn area_bound(bin: &Bin, item: &ItemType) -> u32 {
        // slack for ratios such as 0.3 / 0.1 landing just below an integer
        let ratio = bin.area() / (item.width * item.length) * (1.0 + 1e-9);
        (ratio.floor() as u32).max(1)
    }
}

fn default_true() -> bool {
    true
}

/// Input: what the caller provides
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackRequest {
    pub bin: Bin,
    pub items: Vec<ItemType>,
    #[serde(default = "default_true")]
    pub allow_rotation: bool,
    #[serde(default)]
    pub supply_cap: SupplyCap,
    /// Heuristics to run, in tie-break order
    #[serde(default = "PlacementHeuristic::all")]
    pub heuristics: Vec<PlacementHeuristic>,
    /// Order strategies to run. Omitted, they are picked from the items.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_strategies: Option<Vec<OrderStrategy>>,
    /// Abort the run once this many milliseconds have passed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_limit_ms: Option<u64>,
    /// Evaluate combinations on the rayon thread pool
    #[serde(default = "default_true")]
    pub parallel: bool,
}

impl PackRequest {
    /// Request with default settings for `bin` and `items`.
    pub fn new(bin: Bin, items: Vec<ItemType>) -> Self {
        Self {
            bin,
            items,
            allow_rotation: true,
            supply_cap: SupplyCap::default(),
            heuristics: PlacementHeuristic::all(),
            order_strategies: None,
            time_limit_ms: None,
            parallel: true,
        }
    }
}

/// Placement of one unit on the bin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub rid: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rotated: bool,
}

/// Heuristic and order strategy that produced a layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WinningCombo {
    pub heuristic_name: String,
    pub order_strategy_name: String,
}

impl std::fmt::Display for WinningCombo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} / {}", self.heuristic_name, self.order_strategy_name)
    }
}

/// Required quantity that was not reached
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shortfall {
    pub rid: String,
    pub required: u32,
    pub placed: u32,
}

/// Two item types with the same size, orientation ignored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateDimensionWarning {
    pub rid_a: String,
    pub rid_b: String,
}

/// Placed units of one item type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeBreakdown {
    pub rid: String,
    pub total: u32,
    pub standard: u32,
    pub rotated: u32,
}

/// Area statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub bin_area: f64,
    pub used_area: f64,
    pub waste_area: f64,
    pub waste_percentage: f64,
}

/// Output: a centered layout that satisfies every priority requirement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackReport {
    pub bin: Bin,
    pub placements: Vec<Placement>,
    pub winning_combo: WinningCombo,
    pub total_placed: usize,
    /// Non-priority required quantities that were not reached
    #[serde(default)]
    pub soft_shortfalls: Vec<Shortfall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duplicate_dimension_warning: Option<DuplicateDimensionWarning>,
    #[serde(default)]
    pub breakdown: Vec<TypeBreakdown>,
    pub summary: Summary,
}

/// Output: no combination satisfied the priority requirements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfeasibleReport {
    /// Always `"Infeasible"`
    pub error: String,
    /// Best count any combination reached for each unmet priority type
    pub unmet_priority: Vec<Shortfall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duplicate_dimension_warning: Option<DuplicateDimensionWarning>,
}

/// Result of a tournament run. Callers must branch on both cases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PackOutcome {
    Packed(PackReport),
    Infeasible(InfeasibleReport),
}

impl PackOutcome {
    pub fn is_feasible(&self) -> bool {
        matches!(self, PackOutcome::Packed(_))
    }

    pub fn report(&self) -> Option<&PackReport> {
        match self {
            PackOutcome::Packed(report) => Some(report),
            PackOutcome::Infeasible(_) => None,
        }
    }
}

/// Error type for packing
#[derive(Debug, thiserror::Error)]
pub enum PackError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Packing was cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, PackError>;
