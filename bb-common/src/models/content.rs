//! Course contents and the handlers that describe what kind of resource they are.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::Display;

use super::{availability::Availability, File, Link, Proctoring};

/// Different resource types on Blackboard.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(from = "String", into = "String")]
pub enum ResourceType {
    Folder,
    File,
    Document,
    ExternalLink,
    ToolLink,
    TurnitinAssignment,
    BltiPlacementPortal,
    Assignment,
    AsmtTestLink,
    Syllabus,
    CourseLink,
    Blankpage,
    Lesson,
    /// Used for any handler this library doesn't know about.
    Other,
}

impl ResourceType {
    pub const ALL: [Self; 14] = [
        Self::Folder,
        Self::File,
        Self::Document,
        Self::ExternalLink,
        Self::ToolLink,
        Self::TurnitinAssignment,
        Self::BltiPlacementPortal,
        Self::Assignment,
        Self::AsmtTestLink,
        Self::Syllabus,
        Self::CourseLink,
        Self::Blankpage,
        Self::Lesson,
        Self::Other,
    ];

    /// Parses the handler id, with or without the `resource/` prefix the API adds.
    pub fn from_api_str(s: &str) -> Self {
        match s.trim_start_matches("resource/") {
            "x-bb-folder" => Self::Folder,
            "x-bb-file" => Self::File,
            "x-bb-document" => Self::Document,
            "x-bb-externallink" => Self::ExternalLink,
            "x-bb-toollink" => Self::ToolLink,
            "x-turnitin-assignment" => Self::TurnitinAssignment,
            "x-bb-bltiplacement-Portal" => Self::BltiPlacementPortal,
            "x-bb-assignment" => Self::Assignment,
            "x-bb-asmt-test-link" => Self::AsmtTestLink,
            "x-bb-syllabus" => Self::Syllabus,
            "x-bb-courselink" => Self::CourseLink,
            "x-bb-blankpage" => Self::Blankpage,
            "x-bb-lesson" => Self::Lesson,
            _ => Self::Other,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Folder => "x-bb-folder",
            Self::File => "x-bb-file",
            Self::Document => "x-bb-document",
            Self::ExternalLink => "x-bb-externallink",
            Self::ToolLink => "x-bb-toollink",
            Self::TurnitinAssignment => "x-turnitin-assignment",
            Self::BltiPlacementPortal => "x-bb-bltiplacement-Portal",
            Self::Assignment => "x-bb-assignment",
            Self::AsmtTestLink => "x-bb-asmt-test-link",
            Self::Syllabus => "x-bb-syllabus",
            Self::CourseLink => "x-bb-courselink",
            Self::Blankpage => "x-bb-blankpage",
            Self::Lesson => "x-bb-lesson",
            Self::Other => "__bblearn_other",
        }
    }
}

impl From<String> for ResourceType {
    fn from(value: String) -> Self {
        Self::from_api_str(&value)
    }
}

impl From<ResourceType> for String {
    fn from(value: ResourceType) -> Self {
        value.as_str().to_string()
    }
}

impl Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An explicit `null` handler id maps to [`ResourceType::Other`]; a missing one stays `None`.
fn handler_id<'de, D>(deserializer: D) -> Result<Option<ResourceType>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(Some(
        raw.map_or(ResourceType::Other, |s| ResourceType::from_api_str(&s)),
    ))
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ContentHandler {
    #[serde(deserialize_with = "handler_id")]
    pub id: Option<ResourceType>,
    pub url: Option<String>,
    pub file: Option<File>,
    pub grade_column_id: Option<String>,
    pub group_content: Option<bool>,
    pub target_id: Option<String>,
    pub target_type: Option<String>,
    pub placement_handle: Option<String>,
    pub assessment_id: Option<String>,
    pub proctoring: Option<Proctoring>,
}

impl ContentHandler {
    #[must_use]
    pub fn new(id: ResourceType) -> Self {
        Self {
            id: Some(id),
            ..Default::default()
        }
    }
}

impl PartialEq<ResourceType> for ContentHandler {
    fn eq(&self, other: &ResourceType) -> bool {
        self.id == Some(*other)
    }
}

impl PartialEq<&str> for ContentHandler {
    fn eq(&self, other: &&str) -> bool {
        self.id == Some(ResourceType::from_api_str(other))
    }
}

impl Display for ContentHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.id {
            Some(id) => write!(f, "{id}"),
            None => write!(f, "None"),
        }
    }
}

/// A content item inside a course (folder, document, file, link...).
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct CourseContent {
    pub id: Option<String>,
    pub title: Option<String>,
    pub body: Option<String>,
    pub created: Option<DateTime<Utc>>,
    pub modified: Option<DateTime<Utc>>,
    pub position: i64,
    pub has_children: bool,
    pub launch_in_new_window: bool,
    pub reviewable: bool,
    pub availability: Option<Availability>,
    pub content_handler: Option<ContentHandler>,
    pub links: Vec<Link>,
    pub has_gradebook_columns: bool,
    pub has_associated_groups: bool,
}

impl CourseContent {
    /// Title of the content, or `Untitled` when it's missing or empty.
    #[inline]
    pub fn display_title(&self) -> &str {
        match self.title.as_deref() {
            Some(t) if !t.is_empty() => t,
            _ => "Untitled",
        }
    }

    /// A version of the title that can be used as a file name.
    pub fn title_path_safe(&self) -> String {
        let safe = sanitize_filename(self.display_title(), '_');
        if safe.is_empty() {
            return String::from("Untitled");
        }
        safe
    }
}

impl Display for CourseContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_title())
    }
}

/// A content item listed beneath another one.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ContentChild {
    #[serde(flatten)]
    pub content: CourseContent,
    pub parent_id: Option<String>,
}

impl std::ops::Deref for ContentChild {
    type Target = CourseContent;

    fn deref(&self) -> &Self::Target {
        &self.content
    }
}

impl Display for ContentChild {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.content.fmt(f)
    }
}

const INVALID_FILENAME_CHARS: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Replaces every character that can't be part of a file name on common platforms.
///
/// Leading/trailing whitespace is stripped afterwards.
pub fn sanitize_filename(name: &str, replacement: char) -> String {
    name.chars()
        .map(|c| {
            if c.is_control() || INVALID_FILENAME_CHARS.contains(&c) {
                replacement
            } else {
                c
            }
        })
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn resource_type_from_str() {
        assert_eq!(ResourceType::from_api_str("x-bb-file"), ResourceType::File);
        assert_eq!(ResourceType::from_api_str("x-bb-folder"), ResourceType::Folder);
        assert_eq!(
            ResourceType::from_api_str("x-bb-document"),
            ResourceType::Document
        );
        assert_eq!(
            ResourceType::from_api_str("x-bb-externallink"),
            ResourceType::ExternalLink
        );
        assert_eq!(
            ResourceType::from_api_str("x-bb-unhandled-resource"),
            ResourceType::Other
        );
    }

    #[test]
    fn handler_id_strips_prefix() {
        for res_type in ResourceType::ALL {
            let raw = format!(r#"{{"id": "resource/{}"}}"#, res_type.as_str());
            let handler: ContentHandler = serde_json::from_str(&raw).unwrap();
            assert_eq!(handler.id, Some(res_type));
        }
    }

    #[test]
    fn handler_id_null_and_missing() {
        let null: ContentHandler = serde_json::from_str(r#"{"id": null}"#).unwrap();
        assert_eq!(null.id, Some(ResourceType::Other));

        let missing: ContentHandler = serde_json::from_str("{}").unwrap();
        assert_eq!(missing.id, None);
    }

    #[test]
    fn handler_display_and_eq() {
        for res_type in ResourceType::ALL {
            let handler = ContentHandler::new(res_type);
            assert_eq!(handler.to_string(), res_type.to_string());
            assert_eq!(handler, res_type);
            assert_eq!(handler, res_type.as_str());
        }
    }

    #[test]
    fn content_display() {
        let content = CourseContent {
            title: Some(String::from("Week 1")),
            ..Default::default()
        };
        assert_eq!(content.to_string(), "Week 1");

        let untitled = CourseContent {
            title: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(untitled.to_string(), "Untitled");
        assert_eq!(CourseContent::default().to_string(), "Untitled");
    }

    #[test]
    fn content_title_path() {
        let path = |t: &str| {
            CourseContent {
                title: Some(t.to_string()),
                ..Default::default()
            }
            .title_path_safe()
        };

        assert_eq!(path("unsafe<path.txt"), "unsafe_path.txt");
        assert_eq!(path("unsafe\\path.txt"), "unsafe_path.txt");
        assert_eq!(path("../../unsafe<path.txt"), ".._.._unsafe_path.txt");
        assert_eq!(path("   "), "Untitled");
    }

    #[test]
    fn child_flattens_content() {
        let child: ContentChild = serde_json::from_str(
            r#"{"id": "_1_1", "title": "Slides", "parentId": "_0_1", "hasChildren": true,
                "contentHandler": {"id": "resource/x-bb-file"}}"#,
        )
        .unwrap();

        assert_eq!(child.parent_id.as_deref(), Some("_0_1"));
        assert_eq!(child.title.as_deref(), Some("Slides"));
        assert!(child.has_children);
        assert_eq!(
            child.content_handler.as_ref().unwrap(),
            &ResourceType::File
        );
    }
}
