//! Branch names guessed from how a route describes itself.
//!
//! The "Providence/Stoughton Line" suggests a Providence branch and a
//! Stoughton branch; a destination of "Ashmont/Braintree" or "Foxboro or
//! Providence" does the same. Only rail routes get names: ferry branches are
//! a stop or two long and bus patterns vary too much for this to help.

use std::sync::LazyLock;

use itertools::Itertools;
use regex::Regex;

use crate::route_branching::segment_graph::BranchSegmentInGraph;
use crate::transit::{DirectionId, Route};

static BRANCHING_ROUTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([\w\s]+)/([\w\s]+) Line$").expect("valid route name regex"));

static BRANCHING_DIRECTION: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    [
        Regex::new(r"^([\w\s]+)/([\w\s]+)$").expect("valid destination regex"),
        Regex::new(r"^([\w\s]+) or ([\w\s]+)$").expect("valid destination regex"),
    ]
});

/// Possible branch names for `route` travelling in `direction`, best first.
pub fn name_candidates(route: &dyn Route, direction: DirectionId) -> Vec<String> {
    if !route.route_type().has_named_branches() {
        return Vec::new();
    }

    let mut candidates = captured_names(&BRANCHING_ROUTE, route.long_name()).unwrap_or_default();
    for direction in [direction, direction.opposite()] {
        let Some(destination) = route.direction_destination(direction) else {
            continue;
        };
        if let Some(names) = BRANCHING_DIRECTION
            .iter()
            .find_map(|regex| captured_names(regex, destination))
        {
            candidates.extend(names);
        }
    }

    candidates
}

fn captured_names(regex: &Regex, text: &str) -> Option<Vec<String>> {
    let captures = regex.captures(text)?;
    Some(
        captures
            .iter()
            .skip(1)
            .flatten()
            .map(|group| group.as_str().to_owned())
            .collect(),
    )
}

/// Branch name candidates of one route, each compiled to a whole-word
/// matcher once.
#[derive(Debug, Clone, Default)]
pub struct BranchNames {
    matchers: Vec<(String, Regex)>,
}

impl BranchNames {
    pub fn new(candidates: impl IntoIterator<Item = String>) -> Self {
        let matchers = candidates
            .into_iter()
            .unique()
            .map(|candidate| {
                let regex = Regex::new(&format!(r"(\b|^){}(\b|$)", regex::escape(&candidate)))
                    .expect("escaped branch name regex must compile");
                (candidate, regex)
            })
            .collect();
        BranchNames { matchers }
    }

    pub fn for_route(route: &dyn Route, direction: DirectionId) -> Self {
        Self::new(name_candidates(route, direction))
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }

    pub fn candidates(&self) -> impl Iterator<Item = &str> {
        self.matchers.iter().map(|(candidate, _)| candidate.as_str())
    }
}

impl BranchSegmentInGraph {
    /// The first candidate appearing as a whole word in one of this
    /// segment's stop names.
    pub fn name(&self, names: &BranchNames) -> Option<String> {
        names
            .matchers
            .iter()
            .find(|(_, regex)| self.stops.iter().any(|stop| regex.is_match(&stop.name)))
            .map(|(candidate, _)| candidate.clone())
    }
}
