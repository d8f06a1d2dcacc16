//! Unique runtime action name allocation
//!
//! Action names are derived from the selected events and must stay unique
//! within the manifest. Allocation is deterministic: given the same existing
//! names and the same sequence of base names, the same indexed names come
//! out (`order-created`, then `order-created-1`, `order-created-2`, ...).
//!
//! Allocation is two-phase. [`NamingState::propose`] computes the default
//! name and a staged copy of the state without touching the live state.
//! [`NamingState::commit`] applies it once the user has confirmed a name, so
//! an aborted prompt leaves the state unchanged.

use crate::events::EventMetadata;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;

/// Base name used when a listener covers more than one event
pub const GENERIC_ACTION_NAME: &str = "generic";

/// Run-scoped bookkeeping for name allocation. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamingState {
    seen_names: BTreeSet<String>,
    last_index_by_base_name: BTreeMap<String, u32>,
}

/// A default name computed for a base name, with the state it would commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proposal {
    pub name: String,
    staged: NamingState,
}

impl NamingState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session from the action names already present in the manifest
    pub fn seeded<I, S>(existing: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            seen_names: existing.into_iter().map(Into::into).collect(),
            last_index_by_base_name: BTreeMap::new(),
        }
    }

    pub fn is_seen(&self, name: &str) -> bool {
        self.seen_names.contains(name)
    }

    pub fn last_index(&self, base_name: &str) -> Option<u32> {
        self.last_index_by_base_name.get(base_name).copied()
    }

    /// Compute the default name for `base_name` without mutating the state.
    ///
    /// `existing` holds the manifest's current action names; they are treated
    /// as taken even when they never went through this state.
    pub fn propose(&self, base_name: &str, existing: &[String]) -> Proposal {
        let taken = |staged: &NamingState, name: &str| {
            staged.seen_names.contains(name) || existing.iter().any(|e| e == name)
        };

        let mut staged = self.clone();

        if !taken(&staged, base_name) {
            staged.seen_names.insert(base_name.to_string());
            return Proposal {
                name: base_name.to_string(),
                staged,
            };
        }

        let mut k = staged.last_index(base_name).unwrap_or(0);
        let indexed = loop {
            k += 1;
            let candidate = format!("{}-{}", base_name, k);
            if !taken(&staged, &candidate) {
                break candidate;
            }
        };

        staged
            .last_index_by_base_name
            .insert(base_name.to_string(), k);
        staged.seen_names.insert(base_name.to_string());
        staged.seen_names.insert(indexed.clone());

        Proposal {
            name: indexed,
            staged,
        }
    }

    /// Commit a confirmed name.
    ///
    /// Accepting the proposed default applies the staged state. An override
    /// only records the chosen name as seen; index counters stay untouched.
    pub fn commit(&mut self, proposal: Proposal, confirmed: &str) {
        if proposal.name == confirmed {
            *self = proposal.staged;
        } else {
            self.seen_names.insert(confirmed.to_string());
        }
    }
}

/// Base name for a selection: the event slug for a single event, `generic`
/// for several. `None` when nothing was selected.
pub fn candidate_base_name(selection: &[EventMetadata]) -> Option<String> {
    match selection {
        [] => None,
        [single] => Some(single.derived_slug.clone()),
        _ => Some(GENERIC_ACTION_NAME.to_string()),
    }
}

fn action_name_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^[a-zA-Z0-9][a-zA-Z0-9-]{2,31}$").ok())
        .as_ref()
}

/// Check a name against the runtime entity name rules (simplified subset)
pub fn validate_action_name(name: &str) -> Result<(), String> {
    if action_name_pattern().is_some_and(|re| re.is_match(name)) {
        return Ok(());
    }
    Err(format!(
        "'{}' is not a valid action name, please make sure that:\n\
         The name has at least 3 characters or less than 33 characters.\n\
         The first character is an alphanumeric character.\n\
         The subsequent characters are alphanumeric.\n\
         The last character isn't a space.\n\
         Note: characters can only be split by '-'.",
        name
    ))
}
