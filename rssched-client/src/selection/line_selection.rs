//! The set of transit routes a run is interested in.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use super::SelectionError;
use crate::scenario::{LineId, RouteId};

/// Category tag attached to a selected route, e.g. a vehicle type group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum Group {
    /// The route belongs to no particular category.
    #[default]
    Ungrouped,
    /// A named category.
    Named(String),
}

impl Group {
    pub fn named(label: impl Into<String>) -> Self {
        Group::Named(label.into())
    }

    /// The category label, if any.
    pub fn label(&self) -> Option<&str> {
        match self {
            Group::Ungrouped => None,
            Group::Named(label) => Some(label),
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Group::Ungrouped => f.write_str("<none>"),
            Group::Named(label) => f.write_str(label),
        }
    }
}

impl From<Option<String>> for Group {
    fn from(label: Option<String>) -> Self {
        label.map_or(Group::Ungrouped, Group::Named)
    }
}

impl From<Group> for Option<String> {
    fn from(group: Group) -> Self {
        match group {
            Group::Ungrouped => None,
            Group::Named(label) => Some(label),
        }
    }
}

/// A selected route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedRoute<'a> {
    pub group: &'a Group,
    pub line: &'a LineId,
    pub route: &'a RouteId,
}

/// The transit routes selected for optimization, grouped by category.
///
/// Each (line, route) pair is selected at most once: adding it again is an
/// error, whatever the group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransitLineSelection {
    routes: BTreeMap<(LineId, RouteId), Group>,
}

impl TransitLineSelection {
    /// Create an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a route of a line under a group.
    pub fn add(
        &mut self,
        group: Group,
        line: LineId,
        route: RouteId,
    ) -> Result<(), SelectionError> {
        if let Some(existing) = self.routes.get(&(line.clone(), route.clone())) {
            return Err(SelectionError::DuplicateRoute {
                line: line.to_string(),
                route: route.to_string(),
                existing: existing.to_string(),
                new: group.to_string(),
            });
        }
        self.routes.insert((line, route), group);
        Ok(())
    }

    /// Ids of every line with at least one selected route.
    pub fn line_ids(&self) -> BTreeSet<LineId> {
        self.routes.keys().map(|(line, _)| line.clone()).collect()
    }

    pub fn contains_line(&self, line: &LineId) -> bool {
        self.routes.keys().any(|(l, _)| l == line)
    }

    pub fn contains_route(&self, line: &LineId, route: &RouteId) -> bool {
        self.routes.contains_key(&(line.clone(), route.clone()))
    }

    /// Group of a selected route.
    pub fn group(&self, line: &LineId, route: &RouteId) -> Option<&Group> {
        self.routes.get(&(line.clone(), route.clone()))
    }

    /// Every distinct group used by the selection.
    pub fn groups(&self) -> BTreeSet<&Group> {
        self.routes.values().collect()
    }

    /// Iterate selected routes ordered by line, then route.
    pub fn routes(&self) -> impl Iterator<Item = SelectedRoute<'_>> {
        self.routes
            .iter()
            .map(|((line, route), group)| SelectedRoute { group, line, route })
    }

    /// Number of selected routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
