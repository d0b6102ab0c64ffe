// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Replay configuration loaded from environment variables.

use crate::error::ReplayError;
use sweep_select_session::{ContainmentStrategy, DEFAULT_PARALLEL_THRESHOLD};

/// Tag that marks scene objects as selectable when none is configured
pub const DEFAULT_TAG: &str = "Selectable";

/// Replay configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Only objects carrying this tag are candidates.
    pub tag: Option<String>,
    /// Object kinds used as candidates when no tag is set.
    pub kinds: Vec<String>,
    /// Containment test applied to each candidate's points.
    pub strategy: ContainmentStrategy,
    /// Candidate count at which classification runs on the rayon pool.
    pub parallel_threshold: usize,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// An unset `SWEEP_SELECT_TAG` means [`DEFAULT_TAG`]; an empty one turns
    /// the tag filter off so `SWEEP_SELECT_KINDS` (comma separated) applies.
    /// An unrecognised `SWEEP_SELECT_STRATEGY` falls back to the default
    /// strategy with a warning.
    pub fn from_env() -> Self {
        Self {
            tag: match std::env::var("SWEEP_SELECT_TAG") {
                Ok(tag) => non_empty(&tag),
                Err(_) => Some(DEFAULT_TAG.into()),
            },
            kinds: std::env::var("SWEEP_SELECT_KINDS")
                .map(|kinds| parse_kinds(&kinds))
                .unwrap_or_default(),
            strategy: match std::env::var("SWEEP_SELECT_STRATEGY") {
                Ok(name) => parse_strategy(&name).unwrap_or_else(|err| {
                    tracing::warn!(error = %err, "Ignoring SWEEP_SELECT_STRATEGY");
                    ContainmentStrategy::default()
                }),
                Err(_) => ContainmentStrategy::default(),
            },
            parallel_threshold: std::env::var("SWEEP_SELECT_PARALLEL_THRESHOLD")
                .unwrap_or_else(|_| DEFAULT_PARALLEL_THRESHOLD.to_string())
                .parse()
                .unwrap_or(DEFAULT_PARALLEL_THRESHOLD),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tag: Some(DEFAULT_TAG.into()),
            kinds: Vec::new(),
            strategy: ContainmentStrategy::default(),
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

/// `None` for a blank filter value
pub fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Split a comma separated kind list, dropping blanks
pub fn parse_kinds(list: &str) -> Vec<String> {
    list.split(',').filter_map(non_empty).collect()
}

/// Parse a strategy by its display name
pub fn parse_strategy(name: &str) -> Result<ContainmentStrategy, ReplayError> {
    let name = name.trim();
    [
        ContainmentStrategy::ConvexPolygon,
        ContainmentStrategy::ConvexMesh,
        ContainmentStrategy::ConcaveVolume,
    ]
    .into_iter()
    .find(|strategy| strategy.name().eq_ignore_ascii_case(name))
    .ok_or_else(|| ReplayError::UnknownStrategy(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategies_parse_by_name() {
        assert_eq!(
            parse_strategy("convex-polygon").unwrap(),
            ContainmentStrategy::ConvexPolygon
        );
        assert_eq!(
            parse_strategy(" Convex-Mesh ").unwrap(),
            ContainmentStrategy::ConvexMesh
        );
        assert_eq!(
            parse_strategy("concave-volume").unwrap(),
            ContainmentStrategy::ConcaveVolume
        );
        assert!(matches!(
            parse_strategy("sphere"),
            Err(ReplayError::UnknownStrategy(name)) if name == "sphere"
        ));
    }

    #[test]
    fn blank_filters_are_dropped() {
        assert_eq!(non_empty("  "), None);
        assert_eq!(non_empty(" Prop ").as_deref(), Some("Prop"));
        assert_eq!(parse_kinds("Chair, ,Table,"), vec!["Chair", "Table"]);
        assert!(parse_kinds("").is_empty());
    }

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.tag.as_deref(), Some("Selectable"));
        assert!(config.kinds.is_empty());
        assert_eq!(config.strategy, ContainmentStrategy::ConcaveVolume);
        assert_eq!(config.parallel_threshold, DEFAULT_PARALLEL_THRESHOLD);
    }
}
