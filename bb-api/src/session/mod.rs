//! Blackboard Learn REST session
//!
//! # Session
//! A [`BlackboardSession`] wraps a `reqwest` client carrying the cookies of an authenticated
//! browser session. Every endpoint is a `GET` against the API base URL:
//!
//! ```text
//! https://blackboard.example.org/learn/api/public/v{version}
//! ```
//!
//! `{version}` is replaced per endpoint (v1 for most of them, v2 for gradebook columns and groups,
//! v3 for courses).
//!
//! Responses with a non-success status become the matching [`ApiError`]. List endpoints accept
//! either a bare JSON array or the `{"results": [...]}` envelope Blackboard uses for paged lists.
//! Only the page returned by the server is decoded; `paging.nextPage` is not followed.
use bb_common::models::{Attachment, ContentChild, Course, CourseContent, Membership};
use bb_common::USER_AGENT;
use log::debug;
use reqwest::{cookie::Jar, Client, Response, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;

use crate::auth::Credentials;
use crate::config::DEFAULT_TIMEOUT;
use crate::error::ApiError;

pub mod endpoints;
pub mod route;

pub use self::route::Route;

const COURSES_API_VERSION: u8 = 3;

/// Authenticated session against a Blackboard Learn REST API.
///
/// Cloning is cheap, clones share the connection pool, cookies and the resolved username.
#[derive(Debug, Clone)]
pub struct BlackboardSession {
    client: Client,
    url: String,
    origin: Url,
    username: Arc<OnceCell<String>>,
}

impl BlackboardSession {
    /// Sets up a session for the API at `url` with the default 12 second timeout.
    ///
    /// # Errors
    /// Fails if `url` is not an absolute `http(s)` URL or the HTTP client can't be built.
    pub fn new(url: &str, credentials: &Credentials) -> Result<Self, ApiError> {
        Self::with_timeout(url, credentials, Duration::from_secs(DEFAULT_TIMEOUT))
    }

    pub fn with_timeout(
        url: &str,
        credentials: &Credentials,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let url = url.trim_end_matches('/').to_string();
        let origin = api_origin(&url)?;

        let jar = Jar::default();
        for pair in credentials.pairs() {
            jar.add_cookie_str(pair, &origin);
        }

        // Use common client for all connections with a set User-Agent
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .cookie_provider(Arc::new(jar))
            .timeout(timeout)
            .build()?;

        debug!("Session set up for {url} (timeout {}s)", timeout.as_secs());

        Ok(Self {
            client,
            url,
            origin,
            username: Arc::new(OnceCell::new()),
        })
    }

    /// API base URL, as given to the session.
    #[inline]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the used client for external use.
    #[inline]
    pub fn client(&self) -> Client {
        self.client.clone()
    }

    /// Username of the session owner in the form `userName:<name>`, usable as a user id in routes.
    ///
    /// Fetched from `/users/me` on first use and kept for the lifetime of the session.
    pub async fn username(&self) -> Result<&str, ApiError> {
        #[derive(Deserialize)]
        struct Me {
            #[serde(rename = "userName")]
            user_name: String,
        }

        let name = self
            .username
            .get_or_try_init(|| async {
                let me = self.fetch_users(Some("me")).await?;
                let me: Me = serde_json::from_value(me)?;
                debug!("Session owner: {}", me.user_name);
                Ok::<_, ApiError>(format!("userName:{}", me.user_name))
            })
            .await?;

        Ok(name.as_str())
    }

    /// Full URL of `route` under the API base.
    pub fn endpoint_url(&self, route: &Route<'_>) -> Result<String, ApiError> {
        let base = self
            .url
            .replace("{version}", &route.api_version().to_string());
        Ok(format!("{base}{}", route.render()?))
    }

    /// Sends a `GET` for `route` and checks the response status.
    pub async fn get(&self, route: &Route<'_>) -> Result<Response, ApiError> {
        let url = self.endpoint_url(route)?;
        debug!("GET {url}");

        let res = self.client.get(&url).send().await?;
        check_status(res).await
    }

    pub async fn get_list<T: DeserializeOwned>(
        &self,
        route: &Route<'_>,
    ) -> Result<Vec<T>, ApiError> {
        let body = self.get(route).await?.text().await?;
        decode_list(&body)
    }

    pub async fn get_one<T: DeserializeOwned>(&self, route: &Route<'_>) -> Result<T, ApiError> {
        let body = self.get(route).await?.text().await?;
        decode_one(&body)
    }

    pub async fn get_value(&self, route: &Route<'_>) -> Result<Value, ApiError> {
        let body = self.get(route).await?.text().await?;
        decode_value(&body)
    }

    /// Downloads a file served outside the REST API (`/bbcswebdav/...`) with the session cookies.
    ///
    /// `url` can be absolute or relative to the Blackboard host. The body is left unread so it
    /// can be streamed.
    pub async fn download_webdav(&self, url: &str) -> Result<Response, ApiError> {
        let target = self
            .origin
            .join(url)
            .map_err(|_| ApiError::InvalidUrl {
                url: url.to_string(),
            })?;

        debug!("GET {target}");
        let res = self.client.get(target).send().await?;
        check_status(res).await
    }

    /// Top-level contents of a course, or a single content item when `content_id` is given.
    pub async fn fetch_contents(
        &self,
        course_id: &str,
        content_id: Option<&str>,
    ) -> Result<Vec<CourseContent>, ApiError> {
        let route = Route::new("/courses/{course_id}/contents/{content_id}")
            .param("course_id", Some(course_id))
            .param("content_id", content_id);

        if content_id.is_some() {
            return Ok(vec![self.get_one(&route).await?]);
        }
        self.get_list(&route).await
    }

    pub async fn fetch_content_children(
        &self,
        course_id: &str,
        content_id: &str,
    ) -> Result<Vec<ContentChild>, ApiError> {
        let route = Route::new("/courses/{course_id}/contents/{content_id}/children")
            .param("course_id", Some(course_id))
            .param("content_id", Some(content_id));

        self.get_list(&route).await
    }

    /// File attachments of a content item. Only file contents have attachments.
    pub async fn fetch_file_attachments(
        &self,
        course_id: &str,
        content_id: &str,
    ) -> Result<Vec<Attachment>, ApiError> {
        let route = attachment_route(course_id, content_id, None);
        self.get_list(&route).await
    }

    pub async fn fetch_file_attachment(
        &self,
        course_id: &str,
        content_id: &str,
        attachment_id: &str,
    ) -> Result<Attachment, ApiError> {
        let route = attachment_route(course_id, content_id, Some(attachment_id));
        self.get_one(&route).await
    }

    /// Requests the contents of an attachment. The body is left unread so it can be streamed.
    pub async fn download(
        &self,
        course_id: &str,
        content_id: &str,
        attachment_id: &str,
    ) -> Result<Response, ApiError> {
        let route = Route::new(
            "/courses/{course_id}/contents/{content_id}/attachments/{attachment_id}/download",
        )
        .param("course_id", Some(course_id))
        .param("content_id", Some(content_id))
        .param("attachment_id", Some(attachment_id));

        self.get(&route).await
    }

    /// Courses the user is enrolled in. `user_id` accepts the `userName:` form.
    pub async fn fetch_user_memberships(
        &self,
        user_id: &str,
    ) -> Result<Vec<Membership>, ApiError> {
        let route = Route::new("/users/{user_id}/courses").param("user_id", Some(user_id));
        self.get_list(&route).await
    }

    pub async fn fetch_courses(&self) -> Result<Vec<Course>, ApiError> {
        let route = Route::new("/courses/{course_id}")
            .version(COURSES_API_VERSION)
            .param::<&str>("course_id", None);

        self.get_list(&route).await
    }

    pub async fn fetch_course(&self, course_id: &str) -> Result<Course, ApiError> {
        let route = Route::new("/courses/{course_id}")
            .version(COURSES_API_VERSION)
            .param("course_id", Some(course_id));

        self.get_one(&route).await
    }
}

fn attachment_route<'a>(
    course_id: &'a str,
    content_id: &'a str,
    attachment_id: Option<&'a str>,
) -> Route<'a> {
    Route::new("/courses/{course_id}/contents/{content_id}/attachments/{attachment_id}")
        .param("course_id", Some(course_id))
        .param("content_id", Some(content_id))
        .param("attachment_id", attachment_id)
}

/// Root URL of the Blackboard host behind an API base URL.
fn api_origin(url: &str) -> Result<Url, ApiError> {
    let invalid = || ApiError::InvalidUrl {
        url: url.to_string(),
    };

    let mut origin = Url::parse(&url.replace("{version}", "1")).map_err(|_| invalid())?;

    if !matches!(origin.scheme(), "http" | "https") || origin.cannot_be_a_base() {
        return Err(invalid());
    }

    origin.set_path("/");
    origin.set_query(None);
    origin.set_fragment(None);
    Ok(origin)
}

/// Passes successful responses through and turns any other status into an [`ApiError`].
///
/// The error message is the `message` field of Blackboard's JSON error body when there is one,
/// otherwise the raw body.
pub async fn check_status(res: Response) -> Result<Response, ApiError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }

    let body = res.text().await.unwrap_or_default();
    debug!("Server returned {status}: {body}");

    Err(ApiError::from_status(status.as_u16(), error_message(&body)))
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

/// Decodes a list response, bare (`[...]`) or wrapped (`{"results": [...]}`).
pub fn decode_list<T: DeserializeOwned>(body: &str) -> Result<Vec<T>, ApiError> {
    let value: Value = serde_json::from_str(body)?;

    let items = match value {
        Value::Object(mut map) if map.contains_key("results") => {
            map.remove("results").unwrap_or_default()
        }
        other => other,
    };

    Ok(serde_json::from_value(items)?)
}

pub fn decode_one<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    Ok(serde_json::from_str(body)?)
}

pub fn decode_value(body: &str) -> Result<Value, ApiError> {
    Ok(serde_json::from_str(body)?)
}

#[cfg(test)]
mod test {
    use bb_common::models::ResourceType;

    use super::*;

    fn session(url: &str) -> BlackboardSession {
        let creds = Credentials::new("JSESSIONID=abc; BbRouter=expires:1").unwrap();
        BlackboardSession::new(url, &creds).unwrap()
    }

    #[test]
    fn endpoint_versions() {
        let ss = session("https://bb.test/learn/api/public/v{version}/");

        assert_eq!(ss.url(), "https://bb.test/learn/api/public/v{version}");
        assert_eq!(
            ss.endpoint_url(&Route::new("/system/version")).unwrap(),
            "https://bb.test/learn/api/public/v1/system/version"
        );
        assert_eq!(
            ss.endpoint_url(
                &Route::new("/courses/{course_id}")
                    .version(3)
                    .param("course_id", Some("_1_1"))
            )
            .unwrap(),
            "https://bb.test/learn/api/public/v3/courses/_1_1"
        );
    }

    #[test]
    fn base_without_version() {
        let ss = session("https://bb.test/api");
        assert_eq!(
            ss.endpoint_url(&Route::new("/sessions").version(2)).unwrap(),
            "https://bb.test/api/sessions"
        );
    }

    #[test]
    fn invalid_base_url() {
        let creds = Credentials::new("JSESSIONID=abc").unwrap();

        for url in ["not a url", "ftp://bb.test/api", "mailto:someone@bb.test"] {
            assert!(matches!(
                BlackboardSession::new(url, &creds),
                Err(ApiError::InvalidUrl { .. })
            ));
        }
    }

    #[test]
    fn origin_is_host_root() {
        let origin = api_origin("https://bb.test/learn/api/public/v{version}?x=1").unwrap();
        assert_eq!(origin.as_str(), "https://bb.test/");
    }

    #[test]
    fn list_bare_and_enveloped() {
        let bare: Vec<Attachment> =
            decode_list(r#"[{"id": "_1_1", "mimeType": "image/png"}]"#).unwrap();
        let wrapped: Vec<Attachment> = decode_list(
            r#"{"results": [{"id": "_1_1", "mimeType": "image/png"}], "paging": {"nextPage": "/x?offset=1"}}"#,
        )
        .unwrap();

        assert_eq!(bare, wrapped);
        assert_eq!(bare[0].mime_type.as_deref(), Some("image/png"));

        let empty: Vec<Attachment> = decode_list(r#"{"results": []}"#).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn list_rejects_objects() {
        assert!(matches!(
            decode_list::<Attachment>(r#"{"id": "_1_1"}"#),
            Err(ApiError::JsonSerializeFail(_))
        ));
        assert!(matches!(
            decode_list::<Attachment>("not json"),
            Err(ApiError::JsonSerializeFail(_))
        ));
    }

    #[test]
    fn single_records() {
        let content: CourseContent = decode_one(
            r#"{"id": "_3_1", "title": "Week 1", "contentHandler": {"id": "resource/x-bb-folder"}}"#,
        )
        .unwrap();

        assert_eq!(content.to_string(), "Week 1");
        assert_eq!(content.content_handler.unwrap(), ResourceType::Folder);

        let value = decode_value(r#"{"learn": {"major": 3900}}"#).unwrap();
        assert_eq!(value["learn"]["major"], 3900);
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            error_message(r#"{"status": 403, "message": "Course is closed"}"#),
            "Course is closed"
        );
        assert_eq!(error_message(" Not Found \n"), "Not Found");
        assert_eq!(error_message(""), "");
    }
}
