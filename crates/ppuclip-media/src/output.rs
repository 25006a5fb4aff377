//! Output naming and duplicate detection.

use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;

use ppuclip_models::{format_compact, ClipArtifact};

/// Characters Windows refuses in filenames; replaced while sanitizing.
const FORBIDDEN: [char; 9] = ['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// Longest sanitized title kept in a filename.
const MAX_TITLE_CHARS: usize = 100;

const DEFAULT_OUTPUT_DIR: &str = "clips";

/// Where a planned clip should land.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannedOutput {
    /// Nothing at the target path yet.
    New(PathBuf),
    /// The exact path already exists; treated as an earlier run's result.
    Exists(ClipArtifact),
}

/// Plans deterministic output paths under a fixed directory.
///
/// The same request always maps to the same filename, which is what makes
/// duplicate detection a pure path check: the file's content is never
/// inspected.
#[derive(Debug, Clone)]
pub struct OutputPlanner {
    output_dir: PathBuf,
}

impl Default for OutputPlanner {
    fn default() -> Self {
        Self::new(DEFAULT_OUTPUT_DIR)
    }
}

impl OutputPlanner {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Plan the output file for a clip window.
    ///
    /// Ensures the output directory exists. Filenames are
    /// `{title}_{HHMMSS}-{HHMMSS}.mp4` over the sanitized title and the
    /// start/end of the window.
    pub async fn plan(
        &self,
        title: &str,
        start_secs: u64,
        duration_secs: u64,
    ) -> io::Result<PlannedOutput> {
        plan_in(&self.output_dir, title, start_secs, duration_secs).await
    }

    /// Plan with an optional caller-supplied destination.
    ///
    /// An override ending in `.mp4` names the target file itself (its parent
    /// is created and the duplicate check still applies); any other override
    /// is used as the output directory; `None` falls back to the planner's
    /// own directory.
    pub async fn plan_with_override(
        &self,
        dest: Option<&Path>,
        title: &str,
        start_secs: u64,
        duration_secs: u64,
    ) -> io::Result<PlannedOutput> {
        match dest {
            Some(file)
                if file
                    .extension()
                    .is_some_and(|e| e.eq_ignore_ascii_case("mp4")) =>
            {
                if let Some(parent) = file.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent).await?;
                }
                resolve(file.to_path_buf()).await
            }
            Some(dir) => plan_in(dir, title, start_secs, duration_secs).await,
            None => self.plan(title, start_secs, duration_secs).await,
        }
    }
}

async fn plan_in(
    dir: &Path,
    title: &str,
    start_secs: u64,
    duration_secs: u64,
) -> io::Result<PlannedOutput> {
    fs::create_dir_all(dir).await?;

    let end_secs = start_secs.saturating_add(duration_secs);
    let filename = format!(
        "{}_{}-{}.mp4",
        sanitize_title(title),
        format_compact(start_secs),
        format_compact(end_secs),
    );
    resolve(dir.join(filename)).await
}

async fn resolve(path: PathBuf) -> io::Result<PlannedOutput> {
    // Reported paths are always absolute, wherever the planner was pointed.
    let path = if path.is_absolute() {
        path
    } else {
        std::env::current_dir()?.join(path)
    };

    match fs::metadata(&path).await {
        Ok(meta) => Ok(PlannedOutput::Exists(ClipArtifact {
            path,
            already_existed: true,
            size_bytes: meta.len(),
        })),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(PlannedOutput::New(path)),
        Err(e) => Err(e),
    }
}

/// Make a video title safe for use as a filename.
///
/// Forbidden characters become `_`, surrounding whitespace and trailing dots
/// are stripped, the result is capped at 100 characters; a title that
/// sanitizes away entirely falls back to `clip`.
pub fn sanitize_title(title: &str) -> String {
    let replaced: String = title
        .chars()
        .map(|c| if FORBIDDEN.contains(&c) { '_' } else { c })
        .collect();
    let trimmed = replaced.trim().trim_end_matches('.');
    if trimmed.is_empty() {
        return "clip".to_string();
    }
    trimmed.chars().take(MAX_TITLE_CHARS).collect()
}
