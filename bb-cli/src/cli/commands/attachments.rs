use bb_api::{
    config::ClientConfig, error::ApiError, filters::AttachmentFilter, session::BlackboardSession,
};
use bb_common::models::{content::sanitize_filename, Attachment};
use clap::Args;
use futures::{Stream, StreamExt};
use indicatif::ProgressBar;
use log::debug;
use owo_colors::OwoColorize;
use std::{
    collections::HashSet,
    path::{Path, PathBuf},
    pin::pin,
};
use tokio::{
    fs::{create_dir_all, remove_file, rename, OpenOptions},
    io::{AsyncWriteExt, BufWriter},
};

use crate::{
    cli::{extra::filter_from_flags, Cli},
    error::CliError,
    progress_bars::DownloadProgress,
};

/// MIME type filter flags shared by `attachments` and `download`.
#[derive(Debug, Args)]
pub struct MimeArgs {
    /// Only keep attachments whose MIME type matches (wildcards allowed, e.g. `image/*`)
    #[clap(long = "mime", value_name = "PATTERN", help_heading = "FILTER")]
    mime_types: Vec<String>,

    /// Drop attachments whose MIME type matches
    #[clap(long = "exclude-mime", value_name = "PATTERN", help_heading = "FILTER")]
    excluded_mime_types: Vec<String>,
}

impl MimeArgs {
    /// Attachment filter from the config file with the command line overrides applied.
    pub fn attachment_filter(&self, configured: &AttachmentFilter) -> AttachmentFilter {
        AttachmentFilter::new(filter_from_flags(
            &self.mime_types,
            &self.excluded_mime_types,
            &configured.mime_types,
        ))
    }
}

async fn filtered_attachments(
    session: &BlackboardSession,
    course: &str,
    content: &str,
    filter: &AttachmentFilter,
) -> Result<Vec<Attachment>, CliError> {
    let all = session.fetch_file_attachments(course, content).await?;
    let total = all.len();

    let kept: Vec<Attachment> = filter.filter(all)?.collect();
    debug!("{} of {total} attachments kept", kept.len());

    Ok(kept)
}

#[derive(Debug, Args)]
pub struct Attachments {
    /// Course or organization ID
    #[clap(value_name = "COURSE ID")]
    course: String,

    /// Content item holding the attachments
    #[clap(value_name = "CONTENT ID")]
    content: String,

    #[clap(flatten)]
    mime: MimeArgs,
}

impl Attachments {
    pub async fn run(&self, args: &Cli, config: &ClientConfig) -> Result<(), CliError> {
        let session = args.session(config).await?;
        let filter = self.mime.attachment_filter(&config.filters.attachments);

        let attachments =
            filtered_attachments(&session, &self.course, &self.content, &filter).await?;

        for at in &attachments {
            println!(
                "{:<14} {:<28} {}",
                at.id.as_deref().unwrap_or_default().blue(),
                at.mime_type.as_deref().unwrap_or("-").dimmed(),
                at.file_name.as_deref().unwrap_or_default().bold()
            );
        }
        Ok(())
    }
}

#[derive(Debug, Args)]
pub struct Download {
    /// Course or organization ID
    #[clap(value_name = "COURSE ID")]
    course: String,

    /// Content item holding the attachments
    #[clap(value_name = "CONTENT ID")]
    content: String,

    #[clap(flatten)]
    mime: MimeArgs,

    /// Where to save files (If the path doesn't exist, it will be created.)
    #[clap(short = 'o', value_name = "PATH", help_heading = "SAVE")]
    output: Option<PathBuf>,
}

impl Download {
    pub async fn run(&self, args: &Cli, config: &ClientConfig) -> Result<(), CliError> {
        let session = args.session(config).await?;
        let filter = self.mime.attachment_filter(&config.filters.attachments);

        let attachments =
            filtered_attachments(&session, &self.course, &self.content, &filter).await?;

        let output_dir = match &self.output {
            Some(dir) => dir.clone(),
            None => std::env::current_dir()?,
        };
        create_dir_all(&output_dir).await?;

        let progress = DownloadProgress::new(attachments.len() as u64);
        let mut taken = HashSet::with_capacity(attachments.len());
        let mut downloaded = 0_usize;

        for at in &attachments {
            let Some(attachment_id) = at.id.as_deref() else {
                progress.skipped("(unnamed)", "has no id,");
                continue;
            };

            let name = claim_file_name(
                attachment_file_name(at, attachment_id),
                attachment_id,
                &mut taken,
            );
            self.fetch(&session, attachment_id, &output_dir.join(name), &progress)
                .await?;
            progress.main_tick();
            downloaded += 1;
        }

        progress.done();

        println!(
            "{} {} {}",
            downloaded.to_string().bold().blue(),
            "files".bold().blue(),
            "downloaded".bold()
        );
        Ok(())
    }

    async fn fetch(
        &self,
        session: &BlackboardSession,
        attachment_id: &str,
        out_path: &Path,
        progress: &DownloadProgress,
    ) -> Result<(), CliError> {
        let res = session
            .download(&self.course, &self.content, attachment_id)
            .await?;

        let name = out_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let bar = progress.add_download(&name, res.content_length());

        let stream = res.bytes_stream().map(|item| item.map_err(ApiError::from));
        let saved = save_stream(stream, out_path, &bar).await;

        bar.finish_and_clear();
        saved?;

        debug!("Finished downloading {name} successfully.");
        Ok(())
    }
}

/// Writes `stream` to `<path>.part` and moves it to `path` once the stream is done.
///
/// On failure the partial file is removed and `path` is left as it was.
async fn save_stream<S, B, E>(stream: S, path: &Path, bar: &ProgressBar) -> Result<(), CliError>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    CliError: From<E>,
{
    let part = part_path(path);

    match write_part(stream, &part, bar).await {
        Ok(()) => {
            rename(&part, path).await?;
            Ok(())
        }
        Err(err) => {
            if let Err(rm) = remove_file(&part).await {
                debug!("Could not remove {}: {rm}", part.display());
            }
            Err(err)
        }
    }
}

async fn write_part<S, B, E>(stream: S, part: &Path, bar: &ProgressBar) -> Result<(), CliError>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    CliError: From<E>,
{
    debug!("Creating/writing to file {}", part.display());
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(part)
        .await?;

    let mut bw = BufWriter::new(file);
    let mut stream = pin!(stream);
    let mut downloaded_bytes = 0;

    while let Some(item) = stream.next().await {
        let chunk = item?;
        let chunk = chunk.as_ref();

        downloaded_bytes += chunk.len() as u64;
        bar.set_position(downloaded_bytes);

        bw.write_all(chunk).await?;
    }

    bw.flush().await?;
    Ok(())
}

fn part_path(path: &Path) -> PathBuf {
    let mut part = path.as_os_str().to_owned();
    part.push(".part");
    PathBuf::from(part)
}

/// Makes `name` unique within one download run by prefixing the attachment id on collisions.
fn claim_file_name(name: String, attachment_id: &str, taken: &mut HashSet<String>) -> String {
    if taken.insert(name.clone()) {
        return name;
    }

    let mut candidate = format!("{}_{name}", sanitize_filename(attachment_id, '_'));
    let mut n = 1;
    while !taken.insert(candidate.clone()) {
        candidate = format!("{}_{n}_{name}", sanitize_filename(attachment_id, '_'));
        n += 1;
    }
    candidate
}

/// File name to save an attachment under.
fn attachment_file_name(at: &Attachment, attachment_id: &str) -> String {
    let name = at
        .file_name
        .as_deref()
        .map(|n| sanitize_filename(n, '_'))
        .filter(|n| !n.is_empty() && n != "." && n != "..");

    name.unwrap_or_else(|| sanitize_filename(attachment_id, '_'))
}
