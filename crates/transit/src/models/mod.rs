//! Transit data models, types, and traits.

pub mod route_stops;
pub mod traits;
pub mod types;

// Re-exports for convenience
pub use route_stops::RouteStopsResult;
pub use traits::{Route, RoutePattern, TransitProvider, TransitStop, Trip};
pub use types::{DirectionId, Result, RouteType, TransitError, Typicality};
