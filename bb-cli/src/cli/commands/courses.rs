use bb_api::{config::ClientConfig, extended::CourseFetch, filters::MembershipFilter};
use bb_common::models::Course;
use clap::Args;
use log::debug;
use owo_colors::OwoColorize;

use crate::{
    cli::{extra::filter_from_flags, Cli},
    error::CliError,
};

#[derive(Debug, Args)]
pub struct Courses {
    /// List the courses of this user instead of the session owner
    #[clap(long, value_name = "USER ID")]
    user: Option<String>,

    /// Skip enrollments created before this year
    #[clap(long, value_name = "YEAR", help_heading = "FILTER")]
    min_year: Option<i32>,

    /// Only keep enrollments from these data sources
    #[clap(long = "data-source", value_name = "ID", help_heading = "FILTER")]
    data_sources: Vec<String>,

    /// Drop enrollments from these data sources
    #[clap(long = "exclude-data-source", value_name = "ID", help_heading = "FILTER")]
    excluded_data_sources: Vec<String>,
}

impl Courses {
    /// Membership filter from the config file with the command line overrides applied.
    pub fn membership_filter(&self, configured: &MembershipFilter) -> MembershipFilter {
        MembershipFilter::new(
            filter_from_flags(
                &self.data_sources,
                &self.excluded_data_sources,
                &configured.data_sources,
            ),
            self.min_year.or(configured.min_year),
        )
    }

    pub async fn run(&self, args: &Cli, config: &ClientConfig) -> Result<(), CliError> {
        let session = args.session(config).await?;

        let user = match &self.user {
            Some(user) => user.clone(),
            None => session.username().await?.to_string(),
        };

        let filter = self.membership_filter(&config.filters.memberships);
        debug!("Fetching courses of {user} with {filter:?}");

        let courses = session.ex_fetch_courses(&user, Some(&filter)).await?;

        print_courses(&courses);
        Ok(())
    }
}

fn print_courses(courses: &[Course]) {
    for course in courses {
        let enrolled = course
            .created
            .map(|c| c.format("%Y-%m-%d").to_string())
            .unwrap_or_default();

        println!(
            "{:<12} {:<10} {}",
            course.id.as_deref().unwrap_or_default().blue().bold(),
            enrolled.dimmed(),
            course.bold()
        );
    }

    println!(
        "{} {}",
        courses.len().to_string().bold().blue(),
        "courses".bold()
    );
}
