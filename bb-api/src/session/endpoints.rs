//! Endpoints returned as raw JSON
//!
//! These calls don't have a typed record yet and hand back the decoded [`Value`]. Ids listed after
//! the `;` in each declaration are optional: passing `None` requests the list form of the
//! endpoint.
//!
//! <https://developer.blackboard.com/portal/displayApi>
use log::debug;
use reqwest::Response;
use serde_json::Value;

use super::{BlackboardSession, Route};
use crate::error::ApiError;

macro_rules! value_endpoints {
    ($(
        $(#[$meta:meta])*
        $name:ident($($req:ident),* $(; $($opt:ident),*)?) => $template:literal $(, version = $version:literal)?;
    )*) => {
        impl BlackboardSession {
            $(
                $(#[$meta])*
                pub async fn $name(
                    &self,
                    $($req: &str,)*
                    $($($opt: Option<&str>,)*)?
                ) -> Result<Value, ApiError> {
                    let route = Route::new($template)
                        $(.version($version))?
                        $(.param(stringify!($req), Some($req)))*
                        $($(.param(stringify!($opt), $opt))*)?;

                    self.get_value(&route).await
                }
            )*
        }
    };
}

value_endpoints! {
    // announcements
    fetch_announcements(; announcement_id) => "/announcements/{announcement_id}";

    // attendance
    fetch_course_meetings(course_id) => "/courses/{course_id}/meetings";
    /// Link to a CSV export of the course attendance.
    fetch_attendance_data_download_url(course_id) => "/courses/{course_id}/meetings/downloadUrl";
    fetch_attendance_records_by_user_id(course_id, user_id) => "/courses/{course_id}/meetings/users/{user_id}";
    fetch_course_meeting(course_id, meeting_id) => "/courses/{course_id}/meetings/{meeting_id}";
    fetch_attendance_records_by_meeting_id(course_id, meeting_id; user_id) => "/courses/{course_id}/meetings/{meeting_id}/users/{user_id}";

    // calendar
    fetch_calendar() => "/calendars";
    fetch_calendar_items(; calendar_item_type, calendar_item_id) => "/calendars/items/{calendar_item_type}/{calendar_item_id}";

    // contents
    fetch_content_groups(course_id, content_id; group_id) => "/courses/{course_id}/contents/{content_id}/groups/{group_id}";
    fetch_course_resources(course_id; resource_id) => "/courses/{course_id}/resources/{resource_id}";
    fetch_course_resource_children(course_id, resource_id) => "/courses/{course_id}/resources/{resource_id}/children";
    /// Whether `user_id` has marked the content as reviewed.
    fetch_review_status(course_id, content_id, user_id) => "/courses/{course_id}/contents/{content_id}/users/{user_id}/reviewStatus";
    fetch_course_announcements(course_id; announcement_id) => "/courses/{course_id}/announcements/{announcement_id}";
    fetch_questions(course_id, assessment_id; question_id) => "/courses/{course_id}/assessments/{assessment_id}/questions/{question_id}";

    // catalog
    fetch_category(category_type; category_id) => "/catalog/categories/{category_type}/{category_id}";
    fetch_category_memberships(category_type, category_id; course_id) => "/catalog/categories/{category_type}/{category_id}/courses/{course_id}";
    fetch_child_categories(category_type, parent_id) => "/catalog/categories/{category_type}/{parent_id}/children";
    fetch_categories(course_id) => "/courses/{course_id}/categories";

    // gradebook
    fetch_attempt_file_metadata(course_id, attempt_id; attempt_file_id) => "/courses/{course_id}/gradebook/attempts/{attempt_id}/files/{attempt_file_id}";
    fetch_grade_notations(course_id; grade_notation_id) => "/courses/{course_id}/gradebook/gradeNotations/{grade_notation_id}";
    fetch_gradebook_categories(course_id; category_id) => "/courses/{course_id}/gradebook/categories/{category_id}";
    fetch_grade_schemas(course_id; schema_id) => "/courses/{course_id}/gradebook/schemas/{schema_id}";
    fetch_grade_columns(course_id; column_id) => "/courses/{course_id}/gradebook/columns/{column_id}", version = 2;
    fetch_column_attempts(course_id, column_id; attempt_id) => "/courses/{course_id}/gradebook/columns/{column_id}/attempts/{attempt_id}", version = 2;
    fetch_column_grades(course_id, column_id; user_id) => "/courses/{course_id}/gradebook/columns/{column_id}/users/{user_id}", version = 2;
    fetch_column_grade_last_changed(course_id, column_id) => "/courses/{course_id}/gradebook/columns/{column_id}/users/lastChanged", version = 2;
    fetch_user_grades(course_id, user_id) => "/courses/{course_id}/gradebook/users/{user_id}", version = 2;
    fetch_grading_periods(course_id; period_id) => "/courses/{course_id}/gradebook/periods/{period_id}";

    // groups
    fetch_group_memberships(course_id, group_id; user_id) => "/courses/{course_id}/groups/{group_id}/users/{user_id}", version = 2;
    fetch_groups(course_id; group_id) => "/courses/{course_id}/groups/{group_id}", version = 2;
    fetch_group_sets(course_id; group_id) => "/courses/{course_id}/groups/sets/{group_id}", version = 2;
    fetch_group_set_children(course_id, group_id) => "/courses/{course_id}/groups/sets/{group_id}/groups", version = 2;

    // memberships and courses
    fetch_course_memberships(course_id; user_id) => "/courses/{course_id}/users/{user_id}";
    fetch_course_children(course_id; child_course_id) => "/courses/{course_id}/children/{child_course_id}";
    fetch_cross_list_set(course_id) => "/courses/{course_id}/crossListSet";
    fetch_task(course_id, task_id) => "/courses/{course_id}/tasks/{task_id}";
    fetch_data_sources(; data_source_id) => "/dataSources/{data_source_id}";

    // institutional hierarchy
    fetch_associated_nodes(course_id) => "/courses/{course_id}/nodes";
    fetch_nodes(; node_id) => "/institutionalHierarchy/nodes/{node_id}";
    fetch_node_children(node_id) => "/institutionalHierarchy/nodes/{node_id}/children";
    fetch_node_course_associations(node_id) => "/institutionalHierarchy/nodes/{node_id}/courses";

    // LTI
    fetch_placements(; placement_id) => "/lti/placements/{placement_id}";
    fetch_domain_config(; domain_id) => "/lti/domains/{domain_id}";

    fetch_performance_review_status(course_id) => "/courses/{course_id}/performance/contentReviewStatus";
    fetch_proctoring_services(; service_id) => "/proctoring/services/{service_id}";

    // roles
    fetch_course_roles(; role_id) => "/courseRoles/{role_id}";
    fetch_institution_roles(; role_id) => "/institutionRoles/{role_id}";
    fetch_system_roles(; role_id) => "/systemRoles/{role_id}";

    // system
    fetch_sessions() => "/sessions";
    fetch_sis_logs(data_set_id) => "/logs/sis/dataSets/{data_set_id}";
    fetch_policies() => "/system/policies/privacy";
    fetch_system_task(task_id) => "/system/tasks/{task_id}";
    /// Current Learn server version.
    fetch_version() => "/system/version";
    fetch_terms(; term_id) => "/terms/{term_id}";

    // users
    /// Properties returned depend on the caller's entitlements. `Some("me")` is the session owner.
    fetch_users(; user_id) => "/users/{user_id}";
    /// Users being observed by `user_id`.
    fetch_observees(user_id) => "/users/{user_id}/observees";
    fetch_observers(user_id) => "/users/{user_id}/observers";
    fetch_current_active_user(user_id) => "/users/{user_id}/sessions";
}

impl BlackboardSession {
    /// Requests the contents of a file submitted for a gradebook attempt.
    pub async fn download_attempt_file(
        &self,
        course_id: &str,
        attempt_id: &str,
        attempt_file_id: &str,
    ) -> Result<Response, ApiError> {
        let route = Route::new(
            "/courses/{course_id}/gradebook/attempts/{attempt_id}/files/{attempt_file_id}/download",
        )
        .param("course_id", Some(course_id))
        .param("attempt_id", Some(attempt_id))
        .param("attempt_file_id", Some(attempt_file_id));

        self.get(&route).await
    }

    /// The server answers this endpoint with a redirect to the image instead of data.
    pub async fn fetch_avatar(&self, user_id: &str) -> Result<Value, ApiError> {
        debug!("Avatar requested for {user_id}");
        Err(ApiError::NotImplemented {
            endpoint: "/users/{user_id}/avatar",
        })
    }
}

#[cfg(test)]
mod test {
    use crate::auth::Credentials;

    use super::*;

    #[tokio::test]
    async fn avatar_not_implemented() {
        let creds = Credentials::new("JSESSIONID=abc").unwrap();
        let ss = BlackboardSession::new("https://bb.test/learn/api/public/v{version}", &creds)
            .unwrap();

        assert!(matches!(
            ss.fetch_avatar("me").await,
            Err(ApiError::NotImplemented { .. })
        ));
    }
}
