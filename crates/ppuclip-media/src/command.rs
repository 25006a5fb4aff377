//! ffmpeg command builder.

use std::path::{Path, PathBuf};

/// Builder for ffmpeg invocations reading a network stream into a local file.
///
/// Argument placement matters to ffmpeg: everything added as an input arg
/// lands before `-i` (so `-ss` seeks before the demuxer opens the stream and
/// `-headers` applies to the HTTP fetch), output args land between `-i` and
/// the output path.
#[derive(Debug, Clone)]
pub struct FfmpegCommand {
    /// Input URL (or file path)
    input: String,
    /// Output file path
    output: PathBuf,
    /// Input arguments (before -i)
    input_args: Vec<String>,
    /// Output arguments (after -i)
    output_args: Vec<String>,
    /// Whether to overwrite the output
    overwrite: bool,
    /// Log level
    log_level: String,
}

impl FfmpegCommand {
    /// Create a new ffmpeg command.
    pub fn new(input: impl Into<String>, output: impl AsRef<Path>) -> Self {
        Self {
            input: input.into(),
            output: output.as_ref().to_path_buf(),
            input_args: Vec::new(),
            output_args: Vec::new(),
            overwrite: true,
            log_level: "error".to_string(),
        }
    }

    /// Add an input argument (before -i).
    pub fn input_arg(mut self, arg: impl Into<String>) -> Self {
        self.input_args.push(arg.into());
        self
    }

    /// Add multiple input arguments.
    pub fn input_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.input_args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Add an output argument (after -i).
    pub fn output_arg(mut self, arg: impl Into<String>) -> Self {
        self.output_args.push(arg.into());
        self
    }

    /// Add multiple output arguments.
    pub fn output_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.output_args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Seek to a position before the demuxer opens the input.
    pub fn seek(self, seconds: u64) -> Self {
        self.input_arg("-ss").input_arg(seconds.to_string())
    }

    /// Input flags for fetching an HLS playlist over plain HTTPS.
    ///
    /// The CDN serves segments with unusual extensions and the playlist
    /// itself redirects across protocols, so the demuxer has to be told to
    /// accept both.
    pub fn permissive_hls_input(self) -> Self {
        self.input_args([
            "-allowed_extensions",
            "ALL",
            "-extension_picky",
            "0",
            "-protocol_whitelist",
            "file,http,https,tcp,tls",
        ])
    }

    /// Browser headers for the stream fetch, CRLF-joined as ffmpeg expects.
    pub fn headers(self, user_agent: &str, referer: &str) -> Self {
        self.input_arg("-headers")
            .input_arg(format!("User-Agent: {user_agent}\r\nReferer: {referer}\r\n"))
    }

    /// Limit the output to a duration in seconds.
    pub fn duration(self, seconds: u64) -> Self {
        self.output_arg("-t").output_arg(seconds.to_string())
    }

    /// Copy streams without re-encoding.
    pub fn stream_copy(self) -> Self {
        self.output_arg("-c").output_arg("copy")
    }

    /// Set the engine log level.
    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Build the command arguments.
    pub fn build_args(&self) -> Vec<String> {
        let mut args = Vec::new();

        args.push("-hide_banner".to_string());
        args.push("-loglevel".to_string());
        args.push(self.log_level.clone());
        args.push("-nostats".to_string());

        // Machine-readable progress on stdout; diagnostics stay on stderr.
        args.push("-progress".to_string());
        args.push("pipe:1".to_string());

        if self.overwrite {
            args.push("-y".to_string());
        }

        args.extend(self.input_args.clone());

        args.push("-i".to_string());
        args.push(self.input.clone());

        args.extend(self.output_args.clone());

        args.push(self.output.to_string_lossy().to_string());

        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_full_clip_invocation() {
        let cmd = FfmpegCommand::new("https://cdn/video.m3u8", "clips/out.mp4")
            .seek(2293)
            .permissive_hls_input()
            .headers("agent", "https://chzzk.naver.com/")
            .duration(60)
            .stream_copy();

        assert_eq!(
            cmd.build_args(),
            vec![
                "-hide_banner",
                "-loglevel",
                "error",
                "-nostats",
                "-progress",
                "pipe:1",
                "-y",
                "-ss",
                "2293",
                "-allowed_extensions",
                "ALL",
                "-extension_picky",
                "0",
                "-protocol_whitelist",
                "file,http,https,tcp,tls",
                "-headers",
                "User-Agent: agent\r\nReferer: https://chzzk.naver.com/\r\n",
                "-i",
                "https://cdn/video.m3u8",
                "-t",
                "60",
                "-c",
                "copy",
                "clips/out.mp4",
            ]
        );
    }

    #[test]
    fn seek_lands_before_input() {
        let args = FfmpegCommand::new("in.m3u8", "out.mp4")
            .seek(10)
            .duration(5)
            .build_args();

        let ss = args.iter().position(|a| a == "-ss").unwrap();
        let input = args.iter().position(|a| a == "-i").unwrap();
        let t = args.iter().position(|a| a == "-t").unwrap();
        assert!(ss < input, "seek must precede the input: {args:?}");
        assert!(input < t, "duration must follow the input: {args:?}");
    }

    #[test]
    fn log_level_is_configurable() {
        let args = FfmpegCommand::new("in.m3u8", "out.mp4")
            .log_level("warning")
            .build_args();
        let pos = args.iter().position(|a| a == "-loglevel").unwrap();
        assert_eq!(args[pos + 1], "warning");
    }
}
