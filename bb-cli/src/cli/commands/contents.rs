use bb_api::config::ClientConfig;
use bb_common::models::{CourseContent, ResourceType};
use clap::Args;
use owo_colors::OwoColorize;

use crate::{cli::Cli, error::CliError};

#[derive(Debug, Args)]
pub struct Contents {
    /// Course or organization ID
    #[clap(value_name = "COURSE ID")]
    course: String,

    /// List the children of this content instead of the top level
    #[clap(long, value_name = "CONTENT ID")]
    parent: Option<String>,
}

impl Contents {
    pub async fn run(&self, args: &Cli, config: &ClientConfig) -> Result<(), CliError> {
        let session = args.session(config).await?;

        let contents: Vec<CourseContent> = match &self.parent {
            Some(parent) => session
                .fetch_content_children(&self.course, parent)
                .await?
                .into_iter()
                .map(|child| child.content)
                .collect(),
            None => session.fetch_contents(&self.course, None).await?,
        };

        for content in &contents {
            print_content(content);
        }
        Ok(())
    }
}

fn print_content(content: &CourseContent) {
    let handler = content
        .content_handler
        .as_ref()
        .and_then(|h| h.id)
        .unwrap_or(ResourceType::Other);

    let kind = match handler {
        ResourceType::Folder | ResourceType::Lesson => "dir ",
        ResourceType::File | ResourceType::Document => "file",
        ResourceType::ExternalLink | ResourceType::CourseLink | ResourceType::ToolLink => "link",
        _ => "    ",
    };

    let id = content.id.as_deref().unwrap_or_default();

    if content.has_children {
        println!("{} {:<14} {}", kind.yellow(), id.blue(), content.bold());
    } else {
        println!("{} {:<14} {}", kind.green(), id.blue(), content);
    }
}
