//! # branchline-transit
//!
//! Read-only transit data model feeding route branch diagrams.
//!
//! ## Features
//!
//! - **Snapshot provider**: All routes, patterns, trips and stops held in memory
//! - **Station hierarchy**: Parent/child stop resolution
//! - **Pluggable storage**: Implement [`TransitProvider`] over your own data
//! - **GTFS compiler**: Build a snapshot straight from a feed (optional)
//!
//! ## Example
//!
//! ```
//! use branchline_transit::prelude::*;
//!
//! let station = StopImpl {
//!     id: StopIdentifier::new("place-pktrm"),
//!     name: "Park Street".into(),
//!     parent_station_id: None,
//!     child_stop_ids: vec![],
//! };
//!
//! let platform = StopImpl {
//!     id: StopIdentifier::new("70075"),
//!     name: "Park Street".into(),
//!     parent_station_id: Some(StopIdentifier::new("place-pktrm")),
//!     child_stop_ids: vec![],
//! };
//!
//! let provider =
//!     StaticTransitProvider::from_data(vec![station, platform], vec![], vec![], vec![]);
//!
//! // Platforms resolve to their station
//! let ancestry = provider.stop_ancestry(&StopIdentifier::new("70075"));
//! assert_eq!(ancestry.len(), 2);
//! assert_eq!(ancestry[1].id().as_str(), "place-pktrm");
//! ```

#[cfg(feature = "compiler")]
pub mod compiler;
pub mod identifiers;
pub mod models;
pub mod provider;

// Re-exports for convenience
pub mod prelude {
    pub use crate::identifiers::*;
    pub use crate::models::{route_stops::*, traits::*, types::*};
    pub use crate::provider::{
        static_provider::StaticTransitProvider, RouteImpl, RoutePatternImpl, StopImpl,
        TransitSnapshot, TripImpl,
    };
}

pub use prelude::*;
