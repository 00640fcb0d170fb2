use std::path::PathBuf;

/// Name of the external downloader executable, resolved via `PATH`.
pub const ENGINE_BIN: &str = "yt-dlp";

/// Fragment concurrency passed to the engine.
pub const CONCURRENT_FRAGMENTS: u32 = 8;

/// Unpadded numbering: 1, 2, 3...
pub const OUTPUT_TEMPLATE: &str = "%(playlist_title)s/%(playlist_index)d - %(title)s.%(ext)s";

/// Archive file at the destination root, outside any per-playlist
/// subfolder (no template expansion).
pub const ARCHIVE_FILENAME: &str = "archive.txt";

/// Immutable description of one engine invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadSpec {
    pub url: String,
    pub output_dir: PathBuf,
    pub cookies: Option<PathBuf>,
    pub archive_file: PathBuf,
}

impl DownloadSpec {
    pub fn new(
        url: impl Into<String>,
        output_dir: impl Into<PathBuf>,
        cookies: Option<PathBuf>,
    ) -> Self {
        let output_dir = output_dir.into();
        let archive_file = output_dir.join(ARCHIVE_FILENAME);
        Self {
            url: url.into(),
            output_dir,
            cookies,
            archive_file,
        }
    }
}

/// Build the exact argument list for one engine invocation, executable name
/// first and the URL as the final positional argument. Pure construction; no
/// existence checks, no validation beyond what the caller already did.
pub fn build_command(spec: &DownloadSpec) -> Vec<String> {
    let mut cmd = vec![
        ENGINE_BIN.to_string(),
        "-f".to_string(),
        "bestvideo+bestaudio/best".to_string(),
        "--merge-output-format".to_string(),
        "mp4".to_string(),
        "--concurrent-fragments".to_string(),
        CONCURRENT_FRAGMENTS.to_string(),
        "--ignore-errors".to_string(),
        "--embed-metadata".to_string(),
        "--download-archive".to_string(),
        spec.archive_file.display().to_string(),
        "-o".to_string(),
        OUTPUT_TEMPLATE.to_string(),
        "--paths".to_string(),
        spec.output_dir.display().to_string(),
    ];
    if let Some(cookies) = &spec.cookies {
        cmd.push("--cookies".to_string());
        cmd.push(cookies.display().to_string());
    }
    cmd.push(spec.url.clone());
    cmd
}
