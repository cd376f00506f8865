pub mod records;
pub mod route_details;

pub use records::{BranchSegmentRecord, BranchStopRecord, RouteStopsInput, StickSideStateRecord};
pub use route_details::{BranchingError, RouteDetailsState};
