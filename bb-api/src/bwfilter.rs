//! Generic whitelist/blacklist filter
//!
//! # BWFilter
//! A [`BWFilter`] narrows a sequence of items by looking at a single field of each one. The field
//! is extracted by a projection supplied by the caller, so the same filter works over any record
//! type.
//!
//! Only one list is ever in effect:
//!
//! | whitelist | blacklist | behavior |
//! |---|---|---|
//! | set | (ignored) | keep only whitelist matches |
//! | absent | set | drop blacklist matches, keep rest |
//! | absent | absent | keep everything |
//!
//! An empty list is still a list: an empty whitelist keeps nothing and an empty blacklist keeps
//! everything.
//!
//! ## Match modes
//! - [`BWFilter::filter`] compares the projected value for exact string equality. An item without
//!   the field never matches, so it is dropped by a whitelist and kept by a blacklist.
//! - [`BWFilter::filter_wc`] matches the projected value against shell-style globs (`*`, `?`,
//!   `[a-z]`). An item without the field is always kept, whichever list is active.
//!
//! ```
//! use bb_api::bwfilter::BWFilter;
//!
//! let items = ["a", "b", "c", "d"];
//!
//! let white = BWFilter::whitelist_only(&["a", "b"]);
//! assert_eq!(white.filter_plain(items).collect::<Vec<_>>(), ["a", "b"]);
//!
//! let black = BWFilter::blacklist_only(&["a", "b"]);
//! assert_eq!(black.filter_plain(items).collect::<Vec<_>>(), ["c", "d"]);
//! ```
use ahash::AHashSet;
use glob::Pattern;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::error::FilterError;

/// Which of the two lists is in effect for a filtering pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Whitelist,
    Blacklist,
}

/// How the projected value is compared against the list entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    Exact,
    Wildcard,
}

/// Decides whether a single item is kept.
///
/// * `list`: the list in effect, `None` when no list is configured.
/// * `mode`: the match mode of the pass.
/// * `matched`: `None` when the item has no value for the projected field, otherwise whether the
///   value matched any entry of the list in effect.
///
/// Under [`MatchMode::Wildcard`] an item without a value is kept even by a whitelist. Exact mode
/// treats it as a value that matches nothing.
#[inline]
#[must_use]
pub fn decide(list: Option<ListKind>, mode: MatchMode, matched: Option<bool>) -> bool {
    match (list, mode, matched) {
        (None, _, _) => true,
        (Some(_), MatchMode::Wildcard, None) => true,
        (Some(ListKind::Whitelist), _, m) => m.unwrap_or(false),
        (Some(ListKind::Blacklist), _, m) => !m.unwrap_or(false),
    }
}

/// Whitelist/blacklist configuration. See the [module docs](self) for the rules.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct BWFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    whitelist: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    blacklist: Option<Vec<String>>,
}

impl BWFilter {
    #[must_use]
    pub const fn new(whitelist: Option<Vec<String>>, blacklist: Option<Vec<String>>) -> Self {
        Self {
            whitelist,
            blacklist,
        }
    }

    #[must_use]
    pub fn whitelist_only<S>(entries: &[S]) -> Self
    where
        S: ToString + Display,
    {
        Self::new(Some(entries.iter().map(ToString::to_string).collect()), None)
    }

    #[must_use]
    pub fn blacklist_only<S>(entries: &[S]) -> Self
    where
        S: ToString + Display,
    {
        Self::new(None, Some(entries.iter().map(ToString::to_string).collect()))
    }

    pub fn whitelist(&self) -> Option<&[String]> {
        self.whitelist.as_deref()
    }

    pub fn blacklist(&self) -> Option<&[String]> {
        self.blacklist.as_deref()
    }

    /// `false` when neither list is configured, i.e. filtering is a no-op.
    #[inline]
    pub const fn is_active(&self) -> bool {
        self.whitelist.is_some() || self.blacklist.is_some()
    }

    /// The list in effect after applying whitelist precedence.
    pub fn active_list(&self) -> Option<(ListKind, &[String])> {
        if let Some(white) = &self.whitelist {
            return Some((ListKind::Whitelist, white));
        }
        self.blacklist
            .as_deref()
            .map(|black| (ListKind::Blacklist, black))
    }

    /// Filters `items` comparing `projection(item)` for exact equality with the list entries.
    ///
    /// The returned iterator is lazy and keeps the original order.
    pub fn filter<'f, T, I, F>(&'f self, projection: F, items: I) -> impl Iterator<Item = T> + 'f
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'f,
        F: Fn(&T) -> Option<&str> + 'f,
        T: 'f,
    {
        let active = self.active_list();
        let kind = active.map(|(kind, _)| kind);

        let entries: AHashSet<&'f str> = active
            .map(|(_, list)| list.iter().map(String::as_str).collect())
            .unwrap_or_default();

        debug!("Exact filter: {kind:?} with {} entries", entries.len());

        items.into_iter().filter(move |item| {
            let matched = projection(item).map(|value| entries.contains(value));
            decide(kind, MatchMode::Exact, matched)
        })
    }

    /// Filters `items` matching `projection(item)` against the list entries as glob patterns.
    ///
    /// # Errors
    /// Returns [`FilterError::InvalidPattern`] before yielding anything if an entry of the list in
    /// effect is not a valid pattern.
    pub fn filter_wc<'f, T, I, F>(
        &'f self,
        projection: F,
        items: I,
    ) -> Result<impl Iterator<Item = T> + 'f, FilterError>
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'f,
        F: Fn(&T) -> Option<&str> + 'f,
        T: 'f,
    {
        let active = self.active_list();
        let kind = active.map(|(kind, _)| kind);

        let patterns = match active {
            Some((_, list)) => compile_patterns(list)?,
            None => Vec::new(),
        };

        debug!("Wildcard filter: {kind:?} with {} patterns", patterns.len());

        Ok(items.into_iter().filter(move |item| {
            let matched = projection(item).map(|value| patterns.iter().any(|p| p.matches(value)));
            decide(kind, MatchMode::Wildcard, matched)
        }))
    }

    /// Exact filter over string-like items, using each item as its own projected value.
    pub fn filter_plain<'f, S, I>(&'f self, items: I) -> impl Iterator<Item = S> + 'f
    where
        I: IntoIterator<Item = S>,
        I::IntoIter: 'f,
        S: AsRef<str> + 'f,
    {
        self.filter(|item: &S| Some(item.as_ref()), items)
    }
}

fn compile_patterns(list: &[String]) -> Result<Vec<Pattern>, FilterError> {
    list.iter()
        .map(|raw| {
            Pattern::new(raw).map_err(|source| FilterError::InvalidPattern {
                pattern: raw.clone(),
                source,
            })
        })
        .collect()
}
