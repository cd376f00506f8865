//! Snapshot compilers from external feed formats.

pub mod gtfs;
pub mod patterns;

pub use gtfs::compile_gtfs;
pub use patterns::derive_route_patterns;
