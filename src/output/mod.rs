use anyhow::Result;
use std::path::Path;

use crate::cli::OutputFormat;
use crate::pipeline::SubmissionReport;
use crate::transcript::TranscriptText;
use crate::video::VideoId;

pub mod formatters;

pub use formatters::*;

/// Render a submission report in the requested format
pub fn render_report(report: &SubmissionReport, format: &OutputFormat) -> Result<String> {
    let content = match format {
        OutputFormat::Text => format_as_text(report),
        OutputFormat::Markdown => format_as_markdown(report),
        OutputFormat::Json => format_as_json(report)?,
    };

    Ok(content)
}

/// Render a fetched transcript; markdown is treated as text
pub fn render_transcript(
    video_id: &VideoId,
    transcript: &TranscriptText,
    format: &OutputFormat,
) -> Result<String> {
    match format {
        OutputFormat::Json => format_transcript_as_json(video_id, transcript),
        OutputFormat::Text | OutputFormat::Markdown => Ok(transcript.to_string()),
    }
}

/// Save rendered output to file
pub fn save_to_file(content: &str, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs_err::create_dir_all(parent)?;
    }

    fs_err::write(path, content)?;
    Ok(())
}

/// Print rendered output to console
pub fn print_to_console(content: &str) {
    println!("{}", content);
}
