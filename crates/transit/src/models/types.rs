//! Core data types and enums for transit data.

use crate::identifiers::*;

// ============================================================================
// Enums
// ============================================================================

/// GTFS route types
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum RouteType {
    /// Light rail
    Tram = 0,
    /// Heavy rail
    Subway = 1,
    /// Commuter rail
    Rail = 2,
    Bus = 3,
    Ferry = 4,
    CableTram = 5,
    AerialLift = 6,
    Funicular = 7,
}

impl RouteType {
    pub fn from_gtfs(value: u16) -> Option<Self> {
        match value {
            0 => Some(Self::Tram),
            1 => Some(Self::Subway),
            2 => Some(Self::Rail),
            3 => Some(Self::Bus),
            4 => Some(Self::Ferry),
            5 => Some(Self::CableTram),
            6 => Some(Self::AerialLift),
            7 => Some(Self::Funicular),
            _ => None,
        }
    }

    /// Whether branches of this mode are named after their terminals.
    ///
    /// Bus service patterns vary too widely and ferry branches are only one
    /// or two stops long, so only rail modes qualify.
    pub fn has_named_branches(self) -> bool {
        matches!(self, Self::Tram | Self::Subway | Self::Rail)
    }
}

/// Trip direction (0 = outbound, 1 = inbound per GTFS)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u8", into = "u8"))]
#[repr(u8)]
pub enum DirectionId {
    Outbound = 0,
    Inbound = 1,
}

impl DirectionId {
    pub fn from_gtfs(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Outbound),
            1 => Some(Self::Inbound),
            _ => None,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn opposite(self) -> Self {
        match self {
            Self::Outbound => Self::Inbound,
            Self::Inbound => Self::Outbound,
        }
    }
}

impl From<DirectionId> for u8 {
    fn from(direction: DirectionId) -> Self {
        direction as u8
    }
}

impl TryFrom<u8> for DirectionId {
    type Error = TransitError;

    fn try_from(value: u8) -> Result<Self> {
        Self::from_gtfs(value)
            .ok_or_else(|| TransitError::InvalidData(format!("invalid direction id {value}")))
    }
}

impl std::fmt::Display for DirectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", *self as u8)
    }
}

/// How normal a route pattern is, most normal first.
///
/// The derived ordering follows declaration order, so the minimum of a set
/// of typicalities is the most typical one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Typicality {
    /// Regular service
    Typical,
    /// Minor variation, e.g. a rush-hour deviation
    Deviation,
    /// Irregular service, e.g. school trips or short turns
    Atypical,
    /// Planned detour around a disruption
    Diversion,
}

impl Typicality {
    pub fn from_gtfs(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Typical),
            2 => Some(Self::Deviation),
            3 => Some(Self::Atypical),
            4 => Some(Self::Diversion),
            _ => None,
        }
    }
}

impl std::fmt::Display for Typicality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Typical => "Typical",
            Self::Deviation => "Deviation",
            Self::Atypical => "Atypical",
            Self::Diversion => "Diversion",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum TransitError {
    #[error("Stop not found: {0}")]
    StopNotFound(StopIdentifier),

    #[error("Route not found: {0}")]
    RouteNotFound(RouteIdentifier),

    #[error("Trip not found: {0}")]
    TripNotFound(TripIdentifier),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub type Result<T> = std::result::Result<T, TransitError>;
