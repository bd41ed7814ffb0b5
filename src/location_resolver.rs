//! Location Resolution Module
//!
//! Turns free-text input into the [`ResolvedLocation`] passed to the weather
//! endpoints. Depending on how many candidates the search endpoint returns the
//! resolver reports no match, resolves immediately, or waits for the user to
//! pick from a list. A pick stays in effect until the next query.

use crate::api::WeatherApi;
use crate::models::{AUTO_DETECT, Candidate, LocationQuery, ResolvedLocation};
use crate::notice::Notice;
use std::fmt;
use tracing::{debug, warn};

/// Option 0 of every selection list
pub const PLACEHOLDER: &str = "-- Select a location --";

pub const NO_MATCH_WARNING: &str = "No locations found, please enter a valid location details.";

/// Where the resolver is after the last query
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ResolverState {
    /// No query submitted yet
    #[default]
    Empty,
    /// Sentinel query, handed to the provider without searching
    AutoDetect,
    NoMatch {
        query: String,
    },
    SingleMatch {
        query: String,
        candidate: Candidate,
    },
    /// `selected` indexes the option list, so 0 is the placeholder
    MultiMatch {
        query: String,
        candidates: Vec<Candidate>,
        selected: usize,
    },
}

impl fmt::Display for ResolverState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("waiting for a query"),
            Self::AutoDetect => f.write_str("auto-detect"),
            Self::NoMatch { .. } => f.write_str("no match"),
            Self::SingleMatch { .. } => f.write_str("single match"),
            Self::MultiMatch {
                candidates,
                selected: 0,
                ..
            } => write!(f, "{} matches, none selected", candidates.len()),
            Self::MultiMatch {
                candidates,
                selected,
                ..
            } => write!(f, "{} matches, option {selected} selected", candidates.len()),
        }
    }
}

/// Service for resolving location input
#[derive(Debug, Default)]
pub struct LocationResolver {
    state: ResolverState,
    resolved: Option<ResolvedLocation>,
}

impl LocationResolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> &ResolverState {
        &self.state
    }

    /// Location to fetch weather for, if any
    #[must_use]
    pub fn resolved(&self) -> Option<&ResolvedLocation> {
        self.resolved.as_ref()
    }

    /// Last submitted query as normalized, if any
    #[must_use]
    pub fn query(&self) -> Option<&str> {
        match &self.state {
            ResolverState::Empty => None,
            ResolverState::AutoDetect => Some(AUTO_DETECT),
            ResolverState::NoMatch { query }
            | ResolverState::SingleMatch { query, .. }
            | ResolverState::MultiMatch { query, .. } => Some(query.as_str()),
        }
    }

    /// Currently selected option; 0 outside of a multi-match
    #[must_use]
    pub fn selected_index(&self) -> usize {
        match &self.state {
            ResolverState::MultiMatch { selected, .. } => *selected,
            _ => 0,
        }
    }

    /// Selection list with the placeholder first, only while a choice is pending or made
    #[must_use]
    pub fn options(&self) -> Option<Vec<String>> {
        match &self.state {
            ResolverState::MultiMatch { candidates, .. } => Some(
                std::iter::once(PLACEHOLDER.to_string())
                    .chain(candidates.iter().map(Candidate::label))
                    .collect(),
            ),
            _ => None,
        }
    }

    /// Submit a new query, superseding any previous resolution
    pub fn submit_query<A: WeatherApi + ?Sized>(&mut self, api: &mut A, input: &str) -> Vec<Notice> {
        let term = match LocationQuery::parse(input) {
            LocationQuery::AutoDetect => {
                debug!("Query resolves to auto-detect");
                self.state = ResolverState::AutoDetect;
                self.resolved = Some(ResolvedLocation::AutoDetect);
                return vec![Notice::info(format!(
                    "Using auto-detected location ({})",
                    ResolvedLocation::AutoDetect
                ))];
            }
            LocationQuery::Search(term) => term,
        };

        debug!("Searching for location: {}", term);
        self.resolved = None;

        let mut candidates = match api.search(&term) {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!("Location search failed for '{}': {}", term, e);
                self.state = ResolverState::NoMatch { query: term };
                return vec![
                    Notice::error(e.user_message()),
                    Notice::warning(NO_MATCH_WARNING),
                ];
            }
        };

        match candidates.len() {
            0 => {
                self.state = ResolverState::NoMatch { query: term };
                vec![Notice::warning(NO_MATCH_WARNING)]
            }
            1 => {
                let candidate = candidates.remove(0);
                let resolved = candidate.resolve();
                debug!("Single match resolved to {}", resolved);
                let notice = Notice::info(format!("Location: {} ({resolved})", candidate.label()));
                self.resolved = Some(resolved);
                self.state = ResolverState::SingleMatch {
                    query: term,
                    candidate,
                };
                vec![notice]
            }
            count => {
                debug!("{} candidates for '{}', waiting for a selection", count, term);
                self.state = ResolverState::MultiMatch {
                    query: term,
                    candidates,
                    selected: 0,
                };
                vec![Notice::info("Multiple locations found, please select:")]
            }
        }
    }

    /// Pick option `index` of the selection list; 0 clears the resolution
    pub fn select(&mut self, index: usize) -> Vec<Notice> {
        let ResolverState::MultiMatch {
            candidates,
            selected,
            ..
        } = &mut self.state
        else {
            return vec![Notice::warning(
                "There is no location list to select from. Enter a location first.",
            )];
        };

        if index > candidates.len() {
            return vec![Notice::warning(format!(
                "Option {index} is out of range, choose 0-{}.",
                candidates.len()
            ))];
        }

        *selected = index;
        match index.checked_sub(1).and_then(|i| candidates.get(i)) {
            Some(candidate) => {
                let resolved = candidate.resolve();
                let notice = Notice::info(format!("Location: {} ({resolved})", candidate.label()));
                self.resolved = Some(resolved);
                vec![notice]
            }
            None => {
                self.resolved = None;
                vec![Notice::info("Location selection cleared.")]
            }
        }
    }
}
