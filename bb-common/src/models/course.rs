use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

use super::{availability::Availability, content::sanitize_filename, Enrollment, Locale};

/// Separator between the course code and the course title in [`Course::name`].
const CODE_SEPARATOR: &str = " : ";

/// An academic course or organization.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Course {
    pub id: Option<String>,
    pub course_id: Option<String>,
    /// Usually in the form `CODE : Title, extra info`
    pub name: Option<String>,
    pub description: Option<String>,
    pub created: Option<DateTime<Utc>>,
    pub modified: Option<DateTime<Utc>>,
    pub organization: bool,
    pub ultra_status: Option<String>,
    pub closed_complete: bool,
    pub availability: Option<Availability>,
    pub enrollment: Option<Enrollment>,
    pub locale: Option<Locale>,
    pub external_access_url: Option<String>,
}

impl Course {
    fn name(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.is_empty())
    }

    /// Course code parsed from the name.
    pub fn code(&self) -> Option<&str> {
        self.name()
            .and_then(|name| name.split(CODE_SEPARATOR).next())
    }

    /// Course title parsed from the name, safe to use as a file name.
    pub fn title(&self) -> Option<String> {
        self.name().map(|name| {
            let after_code = name
                .split_once(CODE_SEPARATOR)
                .map_or(name, |(_, rest)| rest);
            let title = after_code.split(',').next().unwrap_or(after_code);
            sanitize_filename(title, '_')
        })
    }
}

impl Display for Course {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.code(), self.title()) {
            (Some(code), Some(title)) if code != title => write!(f, "{code} - {title}"),
            (_, Some(title)) => write!(f, "{title}"),
            _ => write!(f, "{}", self.id.as_deref().unwrap_or("Unnamed course")),
        }
    }
}
