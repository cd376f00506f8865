//! Transit data providers.

pub mod static_provider;

pub use static_provider::{
    RouteImpl, RoutePatternImpl, StaticTransitProvider, StopImpl, TransitSnapshot, TripImpl,
};
