//! Availability states for courses, contents and memberships
//!
//! # Availability
//! Blackboard marks most objects with an `availability.available` string. Only `No` and
//! `Disabled` hide the object from the user, every other value (including the ones this library
//! doesn't know about) keeps it visible.
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Display;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(from = "String", into = "String")]
pub enum Available {
    Yes,
    Term,
    No,
    Disabled,
    PartiallyVisible,
    /// Any value not covered by the variants above.
    Other,
}

impl Available {
    /// Guess the variant from the raw API string. Never fails, unknown values become
    /// [`Available::Other`].
    pub fn from_api_str(s: &str) -> Self {
        match s {
            "Yes" => Self::Yes,
            "Term" => Self::Term,
            "No" => Self::No,
            "Disabled" => Self::Disabled,
            "PartiallyVisible" => Self::PartiallyVisible,
            _ => Self::Other,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Yes => "Yes",
            Self::Term => "Term",
            Self::No => "No",
            Self::Disabled => "Disabled",
            Self::PartiallyVisible => "PartiallyVisible",
            Self::Other => "__bblearn_other",
        }
    }

    /// Whether the object can be seen by the user.
    #[inline]
    pub const fn is_available(&self) -> bool {
        !matches!(self, Self::No | Self::Disabled)
    }
}

impl From<String> for Available {
    fn from(value: String) -> Self {
        Self::from_api_str(&value)
    }
}

impl From<Available> for String {
    fn from(value: Available) -> Self {
        value.as_str().to_string()
    }
}

impl Display for Available {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Course duration type.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(from = "String", into = "String")]
pub enum DurationType {
    Continuous,
    DateRange,
    FixedNumDays,
    Term,
    Other,
}

impl DurationType {
    pub fn from_api_str(s: &str) -> Self {
        match s {
            "Continuous" => Self::Continuous,
            "DateRange" => Self::DateRange,
            "FixedNumDays" => Self::FixedNumDays,
            "Term" => Self::Term,
            _ => Self::Other,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Continuous => "Continuous",
            Self::DateRange => "DateRange",
            Self::FixedNumDays => "FixedNumDays",
            Self::Term => "Term",
            Self::Other => "__bblearn_other",
        }
    }
}

impl From<String> for DurationType {
    fn from(value: String) -> Self {
        Self::from_api_str(&value)
    }
}

impl From<DurationType> for String {
    fn from(value: DurationType) -> Self {
        value.as_str().to_string()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Duration {
    #[serde(rename = "type")]
    pub kind: Option<DurationType>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Availability {
    pub available: Option<Available>,
    pub allow_guests: bool,
    pub adaptive_release: HashMap<String, String>,
    pub duration: Option<Duration>,
}

impl Availability {
    /// Follows [`Available::is_available`]. A missing `available` field counts as unavailable.
    #[inline]
    pub fn is_available(&self) -> bool {
        self.available.is_some_and(|a| a.is_available())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn duration_type_from_str() {
        assert_eq!(DurationType::from_api_str("Continuous"), DurationType::Continuous);
        assert_eq!(DurationType::from_api_str("DateRange"), DurationType::DateRange);
        assert_eq!(DurationType::from_api_str("FixedNumDays"), DurationType::FixedNumDays);
        assert_eq!(DurationType::from_api_str("Term"), DurationType::Term);
        assert_eq!(
            DurationType::from_api_str("ARandomDurationType"),
            DurationType::Other
        );
    }

    #[test]
    fn available_from_str() {
        assert_eq!(Available::from_api_str("No"), Available::No);
        assert_eq!(Available::from_api_str("Yes"), Available::Yes);
        assert_eq!(Available::from_api_str("Term"), Available::Term);
        assert_eq!(Available::from_api_str("Disabled"), Available::Disabled);
        assert_eq!(
            Available::from_api_str("PartiallyVisible"),
            Available::PartiallyVisible
        );
        assert_eq!(Available::from_api_str("NotReal"), Available::Other);
    }

    #[test]
    fn available_visibility() {
        for s in ["Yes", "Term", "PartiallyVisible", "UnexpectedValue"] {
            assert!(Available::from_api_str(s).is_available(), "{s} should be visible");
        }
        for s in ["No", "Disabled"] {
            assert!(!Available::from_api_str(s).is_available(), "{s} should be hidden");
        }
    }

    #[test]
    fn availability_follows_available() {
        for a in [
            Available::Yes,
            Available::Term,
            Available::No,
            Available::Disabled,
            Available::PartiallyVisible,
            Available::Other,
        ] {
            let av = Availability {
                available: Some(a),
                ..Default::default()
            };
            assert_eq!(av.is_available(), a.is_available());
        }

        assert!(!Availability::default().is_available());
    }

    #[test]
    fn availability_deserialize_unknown() {
        let av: Availability = serde_json::from_str(
            r#"{"available": "SomethingNew", "allowGuests": true, "duration": {"type": "Term"}}"#,
        )
        .unwrap();

        assert_eq!(av.available, Some(Available::Other));
        assert!(av.allow_guests);
        assert_eq!(
            av.duration.and_then(|d| d.kind),
            Some(DurationType::Term)
        );
    }
}
