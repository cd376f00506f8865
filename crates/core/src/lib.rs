pub mod route_branching;

// Re-export transit from the transit crate
pub use branchline_transit as transit;
