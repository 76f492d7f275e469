//! Records returned by the Blackboard Learn REST API
//!
//! # Models
//! Every record mirrors the JSON object the API sends back. All fields are optional or have a
//! default, since what the server returns depends on the caller's entitlements, and unknown fields
//! are ignored.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod availability;
pub mod content;
pub mod course;

pub use self::availability::{Availability, Available, Duration, DurationType};
pub use self::content::{ContentChild, ContentHandler, CourseContent, ResourceType};
pub use self::course::Course;

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Locale {
    pub force: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Enrollment {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Proctoring {
    pub secure_browser_required_to_take: bool,
    pub secure_browser_required_to_review: bool,
    pub webcam_required: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct File {
    pub file_name: Option<String>,
}

/// File attached to a content item.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Attachment {
    pub id: Option<String>,
    pub file_name: Option<String>,
    /// Used by the attachment filter to select which files to keep.
    pub mime_type: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Link {
    pub href: Option<String>,
    pub rel: Option<String>,
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// Relation between a user and a course.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Membership {
    pub id: Option<String>,
    pub user_id: Option<String>,
    pub course_id: Option<String>,
    /// Used by the membership filter to tell apart enrollments made by different systems.
    pub data_source_id: Option<String>,
    pub created: Option<DateTime<Utc>>,
    pub modified: Option<DateTime<Utc>>,
    pub availability: Option<Availability>,
    pub course_role_id: Option<String>,
    pub last_accessed: Option<DateTime<Utc>>,
    pub child_course_id: Option<String>,
}

impl Membership {
    /// Whether the course behind this membership can be accessed.
    #[inline]
    pub fn is_available(&self) -> bool {
        self.availability
            .as_ref()
            .is_some_and(Availability::is_available)
    }
}

#[cfg(test)]
mod test {
    use chrono::Datelike;

    use super::*;

    #[test]
    fn membership_from_api() {
        let raw = r#"{
            "id": "_123_1",
            "userId": "_42_1",
            "courseId": "_900_1",
            "dataSourceId": "_2_1",
            "created": "2023-01-15T10:00:00.000Z",
            "availability": {"available": "Yes"},
            "courseRoleId": "Student",
            "somethingNew": 1
        }"#;

        let ms: Membership = serde_json::from_str(raw).unwrap();

        assert_eq!(ms.course_id.as_deref(), Some("_900_1"));
        assert_eq!(ms.data_source_id.as_deref(), Some("_2_1"));
        assert_eq!(ms.created.map(|c| c.year()), Some(2023));
        assert!(ms.is_available());
        assert_eq!(ms.last_accessed, None);
    }

    #[test]
    fn membership_availability() {
        let hidden: Membership =
            serde_json::from_str(r#"{"availability": {"available": "Disabled"}}"#).unwrap();
        assert!(!hidden.is_available());
        assert!(!Membership::default().is_available());
    }

    #[test]
    fn attachment_from_api() {
        let raw = r#"{"id": "_5_1", "fileName": "notes.pdf", "mimeType": "application/pdf"}"#;
        let at: Attachment = serde_json::from_str(raw).unwrap();
        assert_eq!(at.mime_type.as_deref(), Some("application/pdf"));

        let no_mime: Attachment = serde_json::from_str(r#"{"id": "_6_1"}"#).unwrap();
        assert_eq!(no_mime.mime_type, None);
    }
}
