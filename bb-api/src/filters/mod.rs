//! Result filters for attachments and course memberships
//!
//! Both filters are thin compositions over [`BWFilter`]: they pick the field to look at and the
//! match mode, and [`MembershipFilter`] adds a minimum enrollment year on top.
//!
//! ```toml
//! [filters.attachments]
//! whitelist = ["application/pdf", "image/*"]
//!
//! [filters.memberships]
//! blacklist = ["SYSTEM"]
//! min_year = 2023
//! ```
use bb_common::chrono::Datelike;
use bb_common::models::{Attachment, Membership};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::bwfilter::BWFilter;
use crate::error::FilterError;

/// Keeps or drops file attachments by MIME type.
///
/// Entries are glob patterns (`image/*`). Attachments the server sent without a MIME type are
/// always kept.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct AttachmentFilter {
    #[serde(flatten)]
    pub mime_types: BWFilter,
}

impl AttachmentFilter {
    #[must_use]
    pub const fn new(mime_types: BWFilter) -> Self {
        Self { mime_types }
    }

    /// # Errors
    /// Fails with [`FilterError::InvalidPattern`] if one of the configured MIME patterns is
    /// malformed.
    pub fn filter<'f, I>(
        &'f self,
        attachments: I,
    ) -> Result<impl Iterator<Item = Attachment> + 'f, FilterError>
    where
        I: IntoIterator<Item = Attachment>,
        I::IntoIter: 'f,
    {
        self.mime_types
            .filter_wc(|at: &Attachment| at.mime_type.as_deref(), attachments)
    }
}

/// Keeps or drops course memberships by data source and enrollment year.
///
/// The year cutoff runs first and only looks at memberships with a creation timestamp. The
/// data-source lists are then matched exactly against `dataSourceId`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct MembershipFilter {
    #[serde(flatten)]
    pub data_sources: BWFilter,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_year: Option<i32>,
}

impl MembershipFilter {
    #[must_use]
    pub const fn new(data_sources: BWFilter, min_year: Option<i32>) -> Self {
        Self {
            data_sources,
            min_year,
        }
    }

    /// Whether a membership passes the year cutoff.
    #[inline]
    fn recent_enough(&self, ms: &Membership) -> bool {
        match (self.min_year, ms.created) {
            (Some(min), Some(created)) => created.year() >= min,
            _ => true,
        }
    }

    pub fn filter<'f, I>(&'f self, memberships: I) -> impl Iterator<Item = Membership> + 'f
    where
        I: IntoIterator<Item = Membership>,
        I::IntoIter: 'f,
    {
        debug!(
            "Membership filter: min_year {:?}, data sources active: {}",
            self.min_year,
            self.data_sources.is_active()
        );

        let recent = memberships
            .into_iter()
            .filter(move |ms| self.recent_enough(ms));

        self.data_sources
            .filter(|ms: &Membership| ms.data_source_id.as_deref(), recent)
    }
}
