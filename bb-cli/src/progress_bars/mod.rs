use indicatif::{
    HumanBytes, MultiProgress, ProgressBar, ProgressDrawTarget, ProgressState, ProgressStyle,
};
use owo_colors::OwoColorize;
use std::{fmt::Write, time::Duration};

const PROGRESS_CHARS: &str = "━━";

const MAIN_TEMPLATE: &str = "{spinner:.green.bold} {elapsed_precise:.bold} {wide_bar:.green/white.dim} {percent:.bold}  {pos:.green} (eta. {eta:.blue})";

const DOWNLOAD_TEMPLATE: &str = "{spinner:.green.bold} {bar:40.green/white.dim} {percent:.bold} | {byte_progress:21.green} @ {bytes_per_sec:>13.red} {msg}";

/// Progress display for a batch of attachment downloads.
///
/// One main bar counts finished files, every running download gets its own byte bar.
#[derive(Debug)]
pub struct DownloadProgress {
    main_bar: ProgressBar,
    multi_pb: MultiProgress,
}

impl DownloadProgress {
    pub fn new(total_files: u64) -> Self {
        let bar = ProgressBar::new(total_files).with_style(master_progress_style());
        bar.set_draw_target(ProgressDrawTarget::stderr());
        bar.enable_steady_tick(Duration::from_millis(100));

        let multi = MultiProgress::new();
        let main = multi.add(bar);

        Self {
            main_bar: main,
            multi_pb: multi,
        }
    }

    /// Adds a byte counter for a single file. `None` when the server didn't send a length.
    pub fn add_download(&self, name: &str, total_size: Option<u64>) -> ProgressBar {
        let pb = ProgressBar::new(total_size.unwrap_or(0))
            .with_style(download_progress_style())
            .with_message(name.to_string());
        pb.set_draw_target(ProgressDrawTarget::stderr());

        self.multi_pb.insert_before(&self.main_bar, pb)
    }

    pub fn main_tick(&self) {
        self.main_bar.inc(1);
    }

    pub fn skipped(&self, name: &str, reason: &str) {
        self.main_bar.println(format!(
            "{} {} {}",
            name.blue().italic(),
            reason.yellow().bold(),
            "Skipping...".yellow().bold()
        ));
        self.main_bar.inc(1);
    }

    pub fn done(&self) {
        self.main_bar.finish_and_clear();
    }
}

fn master_progress_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template(MAIN_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .with_key("pos", |state: &ProgressState, w: &mut dyn Write| {
            let _ = write!(w, "{}/{}", state.pos(), state.len().unwrap_or_default());
        })
        .with_key("percent", |state: &ProgressState, w: &mut dyn Write| {
            let _ = write!(w, "{:>3.0}%", state.fraction() * 100_f32);
        })
        .progress_chars(PROGRESS_CHARS)
}

fn download_progress_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template(DOWNLOAD_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .with_key("percent", |state: &ProgressState, w: &mut dyn Write| {
            let _ = write!(w, "{:>3.0}%", state.fraction() * 100_f32);
        })
        .with_key(
            "byte_progress",
            |state: &ProgressState, w: &mut dyn Write| match state.len() {
                Some(len) if len > 0 => {
                    let _ = write!(w, "{}/{}", HumanBytes(state.pos()), HumanBytes(len));
                }
                _ => {
                    let _ = write!(w, "{}", HumanBytes(state.pos()));
                }
            },
        )
        .progress_chars(PROGRESS_CHARS)
}
