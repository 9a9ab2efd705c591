//! # Rendering
//!
//! Turns raw stage text into something fit for a terminal or a page:
//! markup is stripped, entities decoded, blank runs collapsed. Also keeps the
//! short in-memory list of recent runs shown by the interactive front end.

use std::collections::VecDeque;

use chrono::Local;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::swarm::{PipelineResult, PipelineStage};

/// Number of runs kept in [`RunHistory`]
pub const HISTORY_LIMIT: usize = 5;

static SCRIPT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<script.*?</script>").unwrap());
static STYLE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<style.*?</style>").unwrap());
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>\n]+>").unwrap());
static BLANK_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());
static ENTITY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z][a-zA-Z0-9]{1,31});").unwrap());

const REPLACEMENT: char = '\u{FFFD}';

/// Sanitize model output for display
pub fn clean_output(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    // Models sometimes return escaped newlines as literal backslash sequences
    let text = text
        .replace("\\r\\n", "\n")
        .replace("\\n", "\n")
        .replace("\\r", "\n");
    let text = unescape_entities(&text);
    let text = SCRIPT_RE.replace_all(&text, "");
    let text = STYLE_RE.replace_all(&text, "");
    let text = TAG_RE.replace_all(&text, "");
    let text = BLANK_RUN_RE.replace_all(&text, "\n\n");
    text.trim().to_string()
}

/// Decode named and numeric HTML entities; unknown names are left as-is
pub fn unescape_entities(text: &str) -> String {
    ENTITY_RE
        .replace_all(text, |caps: &regex::Captures| match caps[1].strip_prefix('#') {
            Some(num) => decode_char_ref(num),
            None => html_escape::decode_html_entities(&caps[0]).into_owned(),
        })
        .into_owned()
}

/// Numeric reference to text, with the HTML5 fix-ups for NUL, C1 controls,
/// surrogates and out-of-range values
fn decode_char_ref(num: &str) -> String {
    let code = match num.strip_prefix('x').or_else(|| num.strip_prefix('X')) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => num.parse(),
    };
    // Overflowing u32 is past the last code point anyway
    let Ok(code) = code else {
        return REPLACEMENT.to_string();
    };

    if let Some(c) = legacy_char_ref(code) {
        return c.to_string();
    }
    if (0xD800..=0xDFFF).contains(&code) || code > 0x10FFFF {
        return REPLACEMENT.to_string();
    }
    if is_dropped_code_point(code) {
        return String::new();
    }
    char::from_u32(code).map(String::from).unwrap_or_else(|| REPLACEMENT.to_string())
}

/// References remapped instead of decoded literally (mostly windows-1252)
fn legacy_char_ref(code: u32) -> Option<char> {
    let c = match code {
        0x00 => REPLACEMENT,
        0x0D => '\r',
        0x80 => '\u{20AC}',
        0x81 => '\u{81}',
        0x82 => '\u{201A}',
        0x83 => '\u{0192}',
        0x84 => '\u{201E}',
        0x85 => '\u{2026}',
        0x86 => '\u{2020}',
        0x87 => '\u{2021}',
        0x88 => '\u{02C6}',
        0x89 => '\u{2030}',
        0x8A => '\u{0160}',
        0x8B => '\u{2039}',
        0x8C => '\u{0152}',
        0x8D => '\u{8D}',
        0x8E => '\u{017D}',
        0x8F => '\u{8F}',
        0x90 => '\u{90}',
        0x91 => '\u{2018}',
        0x92 => '\u{2019}',
        0x93 => '\u{201C}',
        0x94 => '\u{201D}',
        0x95 => '\u{2022}',
        0x96 => '\u{2013}',
        0x97 => '\u{2014}',
        0x98 => '\u{02DC}',
        0x99 => '\u{2122}',
        0x9A => '\u{0161}',
        0x9B => '\u{203A}',
        0x9C => '\u{0153}',
        0x9D => '\u{9D}',
        0x9E => '\u{017E}',
        0x9F => '\u{0178}',
        _ => return None,
    };
    Some(c)
}

/// Control characters and noncharacters that decode to nothing
fn is_dropped_code_point(code: u32) -> bool {
    matches!(code, 0x01..=0x08 | 0x0B | 0x0E..=0x1F | 0x7F..=0x9F | 0xFDD0..=0xFDEF)
        || code & 0xFFFE == 0xFFFE
}

fn section(out: &mut String, title: &str, body: &str, empty_label: &str) {
    out.push_str("### ");
    out.push_str(title);
    out.push_str("\n\n");
    if body.is_empty() {
        out.push_str(&format!("_No {} output_", empty_label));
    } else {
        out.push_str(body);
    }
    out.push_str("\n\n");
}

/// Render a finished run: Coordinator summary first, then each specialist
pub fn render_briefing(topic: &str, result: &PipelineResult) -> String {
    let mut out = format!("# Research Team Briefing: {}\n\n", topic);

    let coordinator = clean_output(&result.coordinator.text());
    section(&mut out, "Coordinator Summary", &coordinator, "coordinator");

    for stage in [
        PipelineStage::Research,
        PipelineStage::Analysis,
        PipelineStage::Strategy,
    ] {
        let name = capitalize(stage.key());
        let body = clean_output(&result.get(stage).text());
        section(&mut out, &format!("{} Output", name), &body, &name);
    }

    let failed = result.failed_stages();
    if !failed.is_empty() {
        let names: Vec<&str> = failed.iter().map(|s| s.key()).collect();
        out.push_str(&format!("> Failed stages: {}\n", names.join(", ")));
    }

    out.trim_end().to_string()
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// A past run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub timestamp: String,
    pub topic: String,
}

/// In-memory run history, capped at [`HISTORY_LIMIT`]
#[derive(Debug, Default)]
pub struct RunHistory {
    entries: VecDeque<HistoryEntry>,
}

impl RunHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a run stamped with the local time
    pub fn record(&mut self, topic: &str) {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        self.push(HistoryEntry {
            timestamp,
            topic: topic.to_string(),
        });
    }

    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push_back(entry);
        while self.entries.len() > HISTORY_LIMIT {
            self.entries.pop_front();
        }
    }

    /// Entries, newest first
    pub fn recent(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter().rev()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Markdown-style list, newest first
    pub fn render(&self) -> String {
        self.recent()
            .map(|e| format!("- **{}** - *{}*", e.topic, e.timestamp))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
