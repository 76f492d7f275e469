//! Endpoint path templates
//!
//! Templates use `{name}` placeholders for whole path segments:
//! `/courses/{course_id}/contents/{content_id}`. Every placeholder has to be bound, either to a
//! value or to `None`. A `None` binding removes the segment together with its leading `/`, which
//! turns most item endpoints into their list form.
use std::borrow::Cow;
use std::fmt::Display;

use crate::error::ApiError;

pub const DEFAULT_API_VERSION: u8 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route<'a> {
    template: &'static str,
    version: u8,
    params: Vec<(&'static str, Option<Cow<'a, str>>)>,
}

impl<'a> Route<'a> {
    #[must_use]
    pub const fn new(template: &'static str) -> Self {
        Self {
            template,
            version: DEFAULT_API_VERSION,
            params: Vec::new(),
        }
    }

    /// API version substituted into the `{version}` placeholder of the base URL.
    #[must_use]
    pub fn version(mut self, version: u8) -> Self {
        self.version = version;
        self
    }

    /// Binds `name` to `value`. Binding the same name twice keeps the last value.
    #[must_use]
    pub fn param<V>(mut self, name: &'static str, value: Option<V>) -> Self
    where
        V: Into<Cow<'a, str>>,
    {
        let value = value.map(Into::into);
        match self.params.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.params.push((name, value)),
        }
        self
    }

    #[inline]
    pub const fn api_version(&self) -> u8 {
        self.version
    }

    #[inline]
    pub const fn template(&self) -> &'static str {
        self.template
    }

    /// Expands the template into a path, percent-encoding bound values.
    ///
    /// # Errors
    /// Returns [`ApiError::MissingRouteParam`] for the first placeholder that has no binding.
    pub fn render(&self) -> Result<String, ApiError> {
        let mut path = String::with_capacity(self.template.len());

        for (idx, segment) in self.template.split('/').enumerate() {
            let piece = match placeholder(segment) {
                Some(name) => match self.params.iter().find(|(n, _)| *n == name) {
                    Some((_, Some(value))) => urlencoding::encode(value),
                    Some((_, None)) => continue,
                    None => {
                        return Err(ApiError::MissingRouteParam {
                            param: name.to_string(),
                        })
                    }
                },
                None => Cow::Borrowed(segment),
            };

            if idx > 0 {
                path.push('/');
            }
            path.push_str(&piece);
        }

        Ok(path)
    }
}

impl Display for Route<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "v{} {}", self.version, self.template)
    }
}

fn placeholder(segment: &str) -> Option<&str> {
    segment
        .strip_prefix('{')
        .and_then(|s| s.strip_suffix('}'))
        .filter(|name| !name.is_empty())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn bound_values() {
        let path = Route::new("/courses/{course_id}/contents/{content_id}")
            .param("course_id", Some("_123_1"))
            .param("content_id", Some("_9_1"))
            .render()
            .unwrap();

        assert_eq!(path, "/courses/_123_1/contents/_9_1");
    }

    #[test]
    fn none_drops_segment() {
        let path = Route::new("/courses/{course_id}/contents/{content_id}")
            .param("course_id", Some("_123_1"))
            .param::<&str>("content_id", None)
            .render()
            .unwrap();

        assert_eq!(path, "/courses/_123_1/contents");

        let path = Route::new("/courses/{course_id}")
            .param::<&str>("course_id", None)
            .render()
            .unwrap();

        assert_eq!(path, "/courses");
    }

    #[test]
    fn missing_binding() {
        let res = Route::new("/courses/{course_id}/contents/{content_id}")
            .param("course_id", Some("_123_1"))
            .render();

        assert!(
            matches!(res, Err(ApiError::MissingRouteParam { param }) if param == "content_id")
        );
    }

    #[test]
    fn values_are_encoded() {
        let path = Route::new("/courses/{course_id}")
            .param("course_id", Some("courseId:CO 2345/A"))
            .render()
            .unwrap();

        assert_eq!(path, "/courses/courseId%3ACO%202345%2FA");
    }

    #[test]
    fn owned_values_and_rebinding() {
        let id = String::from("_1_1");
        let path = Route::new("/users/{user_id}")
            .param("user_id", Some("me"))
            .param("user_id", Some(id))
            .render()
            .unwrap();

        assert_eq!(path, "/users/_1_1");
    }

    #[test]
    fn static_segments() {
        let path = Route::new("/system/version").render().unwrap();
        assert_eq!(path, "/system/version");

        let path = Route::new("/calendars/").render().unwrap();
        assert_eq!(path, "/calendars/");
    }

    #[test]
    fn version() {
        let route = Route::new("/courses/{course_id}").version(3);
        assert_eq!(route.api_version(), 3);
        assert_eq!(Route::new("/sessions").api_version(), DEFAULT_API_VERSION);
        assert_eq!(route.to_string(), "v3 /courses/{course_id}");
    }
}
