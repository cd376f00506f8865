use std::sync::Arc;

use branchline_core::route_branching::{RouteBranching, RouteBranchingError};
use branchline_transit::{
    RouteStopsResult, StaticTransitProvider, TransitProvider, TransitSnapshot,
};
use tokio::sync::RwLock;

use crate::state::records::{BranchSegmentRecord, RouteStopsInput};

/// Anything that keeps the route details screen from drawing a branch
/// diagram. The host shows a flat stop list for all of them.
#[derive(Debug, thiserror::Error, uniffi::Error)]
#[uniffi(flat_error)]
pub enum BranchingError {
    #[error("global data has not been loaded")]
    NoGlobalData,
    #[error("invalid global data: {0}")]
    InvalidGlobalData(String),
    #[error("invalid direction id {0}")]
    InvalidDirection(u8),
    #[error("route {0} not found")]
    RouteNotFound(String),
    #[error("stop graph contains a cycle")]
    StopGraphContainsCycle,
    #[error("segment graph contains a cycle")]
    SegmentGraphContainsCycle,
    #[error("{0}")]
    SegmentsLost(String),
    #[error("{0}")]
    SequenceOutOfOrder(String),
    #[error("{0}")]
    SiblingsOnBothSides(String),
    #[error("{0}")]
    MultipleSegmentsSkippingCurrent(String),
}

impl From<RouteBranchingError> for BranchingError {
    fn from(error: RouteBranchingError) -> Self {
        let message = error.to_string();
        match error {
            RouteBranchingError::RouteNotFound(route) => Self::RouteNotFound(route.to_string()),
            RouteBranchingError::StopGraphContainsCycle => Self::StopGraphContainsCycle,
            RouteBranchingError::SegmentGraphContainsCycle => Self::SegmentGraphContainsCycle,
            RouteBranchingError::SegmentsLost { .. } => Self::SegmentsLost(message),
            RouteBranchingError::SequenceOutOfOrder { .. } => Self::SequenceOutOfOrder(message),
            RouteBranchingError::SiblingsOnBothSides { .. } => Self::SiblingsOnBothSides(message),
            RouteBranchingError::MultipleSegmentsSkippingCurrent { .. } => {
                Self::MultipleSegmentsSkippingCurrent(message)
            }
        }
    }
}

/// Route details for whichever route the host is showing, over the most
/// recently loaded global data.
#[derive(uniffi::Object)]
pub struct RouteDetailsState {
    global_data: RwLock<Option<Arc<StaticTransitProvider>>>,
}

#[uniffi::export]
impl RouteDetailsState {
    #[uniffi::constructor]
    pub fn new() -> Self {
        Self {
            global_data: RwLock::new(None),
        }
    }

    /// Replace the global data with a JSON snapshot. On failure the previous
    /// data stays loaded.
    pub async fn load_global_data(&self, json: String) -> Result<(), BranchingError> {
        let snapshot: TransitSnapshot = serde_json::from_str(&json)
            .map_err(|e| BranchingError::InvalidGlobalData(e.to_string()))?;
        let provider = StaticTransitProvider::from(snapshot);

        tracing::debug!(routes = provider.all_routes().len(), "Loaded global data");
        *self.global_data.write().await = Some(Arc::new(provider));
        Ok(())
    }

    pub async fn route_branching(
        &self,
        route_stops: RouteStopsInput,
    ) -> Result<Vec<BranchSegmentRecord>, BranchingError> {
        let route_stops = RouteStopsResult::try_from(route_stops)?;
        let provider = match *self.global_data.read().await {
            Some(ref provider) => Arc::clone(provider),
            None => return Err(BranchingError::NoGlobalData),
        };

        let branching = RouteBranching::calculate(&route_stops, provider.as_ref())?;
        Ok(branching
            .segments
            .unwrap_or_default()
            .into_iter()
            .map(Into::into)
            .collect())
    }
}

impl Default for RouteDetailsState {
    fn default() -> Self {
        Self::new()
    }
}
