//! Calls combining several API requests into one.
use bb_common::models::{Course, Membership};
use log::{debug, warn};
use std::future::Future;

use crate::error::ApiError;
use crate::filters::MembershipFilter;
use crate::session::BlackboardSession;

/// Fetching the courses of a user together with their details.
///
/// Implementors only provide the two underlying requests.
pub trait CourseFetch: Sync {
    fn user_memberships(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<Vec<Membership>, ApiError>> + Send;

    fn course(&self, course_id: &str) -> impl Future<Output = Result<Course, ApiError>> + Send;

    /// Fetches the memberships of `user_id`, narrows them with `filter` and loads the course
    /// behind every available membership.
    ///
    /// Courses the user isn't allowed to see anymore (`403 Forbidden`) are skipped with a warning,
    /// any other error is returned. The `created` date of each course is replaced by the date the
    /// user was enrolled in it.
    fn ex_fetch_courses(
        &self,
        user_id: &str,
        filter: Option<&MembershipFilter>,
    ) -> impl Future<Output = Result<Vec<Course>, ApiError>> + Send {
        async move {
            let mut memberships = self.user_memberships(user_id).await?;
            debug!("{} memberships for {user_id}", memberships.len());

            if let Some(ft) = filter {
                memberships = ft.filter(memberships).collect();
                debug!("{} memberships left after filtering", memberships.len());
            }

            let mut courses = Vec::with_capacity(memberships.len());

            for ms in memberships {
                if !ms.is_available() {
                    continue;
                }

                let Some(course_id) = ms.course_id.as_deref() else {
                    debug!("Membership {:?} has no course id", ms.id);
                    continue;
                };

                match self.course(course_id).await {
                    Ok(course) => courses.push(Course {
                        created: ms.created,
                        ..course
                    }),
                    Err(ApiError::Forbidden { .. }) => {
                        warn!("Course {course_id} is not available");
                    }
                    Err(err) => return Err(err),
                }
            }

            Ok(courses)
        }
    }
}

impl CourseFetch for BlackboardSession {
    fn user_memberships(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<Vec<Membership>, ApiError>> + Send {
        self.fetch_user_memberships(user_id)
    }

    fn course(&self, course_id: &str) -> impl Future<Output = Result<Course, ApiError>> + Send {
        self.fetch_course(course_id)
    }
}
