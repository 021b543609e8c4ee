// src/present.rs
// View-state adapters for summary, search and highlight results

use crate::backend::{Summary, TranscriptSegment};

const SUMMARY_RULE: &str = "------------------------------------------------------------";

/// Format seconds as `minutes:seconds.hundredths`, e.g. 65.5 -> "1:05.50".
pub fn format_timestamp(seconds: f32) -> String {
    let seconds = seconds.max(0.0);
    let mins = (seconds / 60.0).floor() as u32;
    let secs = seconds - mins as f32 * 60.0;
    format!("{}:{:05.2}", mins, secs)
}

/// Render a segment's span as `start - end`.
pub fn format_time_range(segment: &TranscriptSegment) -> String {
    format!(
        "{} - {}",
        format_timestamp(segment.start),
        format_timestamp(segment.end)
    )
}

/// Displayable summary block: the brief summary first, then the detailed one.
pub fn render_summary(summary: &Summary) -> String {
    format!(
        "BRIEF SUMMARY:\n{}\n\n{}\nDETAILED SUMMARY:\n\n{}",
        summary.short, SUMMARY_RULE, summary.detailed
    )
}

/// One renderable highlight row. Rows keep the order the service returned.
#[derive(Debug, Clone, PartialEq)]
pub struct HighlightLine {
    pub time_range: String,
    pub text: String,
}

pub fn highlight_lines(highlights: &[TranscriptSegment]) -> Vec<HighlightLine> {
    highlights
        .iter()
        .map(|seg| HighlightLine {
            time_range: format_time_range(seg),
            text: seg.text.trim().to_string(),
        })
        .collect()
}

/// Full transcript listing, one `[m:ss.hh] text` line per segment.
pub fn render_transcript(transcript: &[TranscriptSegment]) -> String {
    transcript
        .iter()
        .map(|seg| format!("[{}] {}", format_timestamp(seg.start), seg.text.trim()))
        .collect::<Vec<_>>()
        .join("\n")
}
