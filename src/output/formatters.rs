use anyhow::Result;
use serde::Serialize;

use crate::generate::GenerationResult;
use crate::pipeline::SubmissionReport;
use crate::transcript::TranscriptText;
use crate::video::VideoId;

const DIVIDER: &str = "----------------------------------------";

/// Plain text: one labeled block per platform
pub fn format_as_text(report: &SubmissionReport) -> String {
    let mut output = String::new();

    for post in &report.posts {
        output.push_str(&block_title(post));
        output.push('\n');
        output.push_str(&"=".repeat(block_title(post).chars().count()));
        output.push('\n');
        output.push_str(post.content.trim_end());
        output.push_str("\n\n");
        output.push_str(DIVIDER);
        output.push('\n');
    }

    output
}

/// Markdown: a section per platform
pub fn format_as_markdown(report: &SubmissionReport) -> String {
    let mut output = format!(
        "# Posts for [{}]({})\n\n",
        report.video_id,
        report.video_id.watch_url()
    );

    for post in &report.posts {
        output.push_str(&format!("## {}\n\n", block_title(post)));
        output.push_str(post.content.trim_end());
        output.push_str("\n\n");
    }

    output
}

pub fn format_as_json(report: &SubmissionReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

#[derive(Serialize)]
struct TranscriptDocument<'a> {
    video_id: &'a VideoId,
    characters: usize,
    transcript: &'a str,
}

pub fn format_transcript_as_json(video_id: &VideoId, transcript: &TranscriptText) -> Result<String> {
    let document = TranscriptDocument {
        video_id,
        characters: transcript.char_count(),
        transcript: transcript.as_str(),
    };

    Ok(serde_json::to_string_pretty(&document)?)
}

fn block_title(post: &GenerationResult) -> String {
    if post.is_generated() {
        post.platform.label().to_string()
    } else {
        format!("{} (failed)", post.platform.label())
    }
}
