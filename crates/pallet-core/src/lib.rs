//! Single-bin rectangle packing for pallet loading.
//!
//! A [`Tournament`] packs the request once per placement heuristic and order
//! strategy, using maximal free rectangles, and returns the fullest layout that
//! meets every priority quantity, centered on the bin.
//!
//! ```no_run
//! use pallet_core::{Bin, ItemType, PackOutcome, PackRequest, Tournament};
//!
//! # fn main() -> pallet_core::Result<()> {
//! let request = PackRequest::new(
//!     Bin { width: 1200.0, length: 800.0 },
//!     vec![ItemType {
//!         rid: "Box A".into(),
//!         width: 320.0,
//!         length: 420.0,
//!         required_quantity: None,
//!         priority: true,
//!     }],
//! );
//!
//! match Tournament::new(request)?.run()? {
//!     PackOutcome::Packed(report) => println!("{} boxes", report.total_placed),
//!     PackOutcome::Infeasible(report) => println!("unmet: {:?}", report.unmet_priority),
//! }
//! # Ok(())
//! # }
//! ```

pub mod cancel;
pub mod geometry;
pub mod heuristic;
pub mod maxrects;
pub mod order;
pub mod packer;
pub mod postprocess;
pub mod render;
pub mod supply;
pub mod tournament;
pub mod types;

pub use cancel::CancelToken;
pub use heuristic::PlacementHeuristic;
pub use order::OrderStrategy;
pub use tournament::Tournament;
pub use types::*;
