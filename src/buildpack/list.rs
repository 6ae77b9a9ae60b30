//! Ordered buildpack lists and the positional mutations applied to them.
//!
//! Positions shown to users are 1-based and always looked up through each
//! entry's `ordinal`, never through the raw storage offset. Every list that
//! comes out of [`mutate`] is renumbered so ordinals match positions again.

use crate::error::BuildpackError;
use crate::platform::{BuildpackInstallation, BuildpackUpdate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildpackEntry {
    pub url: String,
    #[serde(default)]
    pub name: Option<String>,
    pub ordinal: usize,
}

impl BuildpackEntry {
    pub fn new(url: impl Into<String>, ordinal: usize) -> Self {
        Self {
            url: url.into(),
            name: None,
            ordinal,
        }
    }
}

impl From<BuildpackInstallation> for BuildpackEntry {
    fn from(installation: BuildpackInstallation) -> Self {
        Self {
            url: installation.buildpack.url,
            name: installation.buildpack.name,
            ordinal: installation.ordinal,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildpackList {
    entries: Vec<BuildpackEntry>,
}

impl BuildpackList {
    /// Build a list from entries in any storage order, keeping their ordinals.
    pub fn from_entries(mut entries: Vec<BuildpackEntry>) -> Self {
        entries.sort_by_key(|entry| entry.ordinal);
        Self { entries }
    }

    fn renumbered(mut entries: Vec<BuildpackEntry>) -> Self {
        for (position, entry) in entries.iter_mut().enumerate() {
            entry.ordinal = position;
        }
        Self { entries }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[BuildpackEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &BuildpackEntry> {
        self.entries.iter()
    }

    pub fn urls(&self) -> Vec<&str> {
        self.entries.iter().map(|entry| entry.url.as_str()).collect()
    }

    /// Storage position of the entry shown to users as `index` (1-based).
    pub fn position_of_index(&self, index: usize) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.ordinal + 1 == index)
    }

    /// Storage position of the entry matching either form of a buildpack.
    pub fn position_of_url(&self, requested: &str, resolved: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.url == requested || entry.url == resolved)
    }

    pub fn validate_index_in_range(&self, index: usize) -> Result<(), BuildpackError> {
        if index == 0 || index > self.entries.len() {
            return Err(BuildpackError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            });
        }
        Ok(())
    }

    /// The full-replace payload for this list, in build order.
    pub fn updates(&self) -> Vec<BuildpackUpdate> {
        self.entries
            .iter()
            .map(|entry| BuildpackUpdate {
                buildpack: entry.url.clone(),
            })
            .collect()
    }

    fn splice(&self, at: usize, delete: usize, insert: Option<String>) -> Self {
        let mut entries = self.entries.clone();
        let inserted = insert.map(|url| BuildpackEntry::new(url, at));
        entries.splice(at..at + delete, inserted);
        Self::renumbered(entries)
    }
}

/// A buildpack as the user typed it together with its resolved URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub requested: String,
    pub url: String,
}

impl Target {
    pub fn new(requested: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            requested: requested.into(),
            url: url.into(),
        }
    }

    /// A target whose requested form is already canonical.
    pub fn url(url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            requested: url.clone(),
            url,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Insert before the entry shown at `index`, or at the end.
    Add { target: Target, index: Option<usize> },
    Update { target: Target, index: usize },
    Remove { index: usize },
    Clear,
}

/// Compute the list that results from applying `operation` to `current`.
///
/// `current` is never modified; on error no new list is produced.
pub fn mutate(current: &BuildpackList, operation: Operation) -> Result<BuildpackList, BuildpackError> {
    match operation {
        Operation::Add { target, index } => {
            if current
                .position_of_url(&target.requested, &target.url)
                .is_some()
            {
                return Err(BuildpackError::AlreadySet(target.requested));
            }
            let at = index
                .and_then(|index| current.position_of_index(index))
                .unwrap_or(current.len());
            Ok(current.splice(at, 0, Some(target.url)))
        }
        Operation::Update { target, index } => {
            let at = locate(current, index)?;
            Ok(current.splice(at, 1, Some(target.url)))
        }
        Operation::Remove { index } => {
            let at = locate(current, index)?;
            Ok(current.splice(at, 1, None))
        }
        Operation::Clear => Ok(BuildpackList::empty()),
    }
}

fn locate(list: &BuildpackList, index: usize) -> Result<usize, BuildpackError> {
    list.validate_index_in_range(index)?;
    list.position_of_index(index)
        .ok_or(BuildpackError::IndexOutOfRange {
            index,
            len: list.len(),
        })
}

/// Parse a user-supplied 1-based index.
///
/// The whole string must be an integer: "1.5" or "2abc" are invalid rather
/// than truncated to their leading digits.
pub fn validate_index(raw: &str) -> Result<usize, BuildpackError> {
    match raw.trim().parse::<i64>() {
        Ok(index) if index > 0 => Ok(index as usize),
        _ => Err(BuildpackError::InvalidIndex),
    }
}
