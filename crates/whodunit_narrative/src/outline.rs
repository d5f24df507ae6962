//! Chapter outlines and the parser that reads them out of model text.

use derive_getters::Getters;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use whodunit_error::{WorkflowError, WorkflowErrorKind};

// "Chapter 3: Title - summary", "## Chapter 3", "**Chapter 3 - Title**: summary"
static CHAPTER_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[\s#>*\-]*chapter\s+(\d+|[ivxlc]+)\b\s*(?:\*\*)?\s*[:.\-–—]?\s*(.*)$")
        .expect("chapter heading regex is valid")
});

// "3. Title: summary", "3) Title - summary"
static NUMBERED_ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\s#>*\-]*(\d+)[.)]\s+(.*)$")
        .expect("numbered item regex is valid")
});

const TITLE_SEPARATORS: [&str; 4] = [": ", " - ", " – ", " — "];

/// One planned chapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct ChapterPlan {
    /// 1-based position in the book
    number: usize,
    /// Chapter title
    title: String,
    /// What happens in the chapter
    summary: String,
}

impl ChapterPlan {
    /// Creates a chapter plan.
    pub fn new(number: usize, title: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            number,
            title: title.into(),
            summary: summary.into(),
        }
    }
}

/// A parsed outline together with the text it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Outline {
    /// Model output as received
    raw: String,
    /// Chapters in reading order
    chapters: Vec<ChapterPlan>,
}

impl Outline {
    /// Parse chapter plans out of free-form outline text.
    ///
    /// Lines that name a chapter explicitly ("Chapter 4: ...") are preferred.
    /// When there are none, a plain numbered list is accepted instead.
    /// Unnumbered lines following a chapter extend its summary. Chapters are
    /// renumbered 1..n in the order they appear.
    pub fn parse(text: &str) -> Result<Self, WorkflowError> {
        let mut chapters = collect(text, &CHAPTER_HEADING);
        if chapters.is_empty() {
            chapters = collect(text, &NUMBERED_ITEM);
        }

        if chapters.is_empty() {
            return Err(WorkflowError::new(WorkflowErrorKind::OutlineParse(
                "no chapter lines found".to_string(),
            )));
        }

        Ok(Self {
            raw: text.to_string(),
            chapters,
        })
    }

    /// Build an outline directly from plans.
    pub fn from_chapters(raw: impl Into<String>, chapters: Vec<ChapterPlan>) -> Self {
        Self {
            raw: raw.into(),
            chapters,
        }
    }

    /// Plan for chapter `number`.
    pub fn chapter(&self, number: usize) -> Option<&ChapterPlan> {
        self.chapters.iter().find(|c| c.number == number)
    }

    /// Number of chapters.
    pub fn len(&self) -> usize {
        self.chapters.len()
    }

    /// True when the outline has no chapters.
    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }
}

fn collect(text: &str, heading: &Regex) -> Vec<ChapterPlan> {
    let mut chapters: Vec<ChapterPlan> = Vec::new();

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if let Some(caps) = heading.captures(trimmed) {
            let rest = caps.get(2).map_or("", |m| m.as_str());
            let (title, summary) = split_title(&rest.replace("**", ""));
            let number = chapters.len() + 1;
            let title = if title.is_empty() {
                format!("Chapter {}", number)
            } else {
                title
            };
            chapters.push(ChapterPlan::new(number, title, summary));
        } else if let Some(last) = chapters.last_mut() {
            let extra = trimmed.trim_start_matches(['-', '*', '>']).trim();
            if !extra.is_empty() {
                if !last.summary.is_empty() {
                    last.summary.push(' ');
                }
                last.summary.push_str(extra);
            }
        }
    }

    chapters
}

fn split_title(rest: &str) -> (String, String) {
    let rest = rest.trim();
    let split = TITLE_SEPARATORS
        .iter()
        .filter_map(|sep| rest.find(sep).map(|idx| (idx, sep.len())))
        .min_by_key(|(idx, _)| *idx);

    match split {
        Some((idx, len)) => (
            clean_title(&rest[..idx]),
            rest[idx + len..].trim().to_string(),
        ),
        None => (clean_title(rest), String::new()),
    }
}

fn clean_title(title: &str) -> String {
    title
        .trim()
        .trim_matches(|c| c == '"' || c == '\'' || c == '*' || c == '_')
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_title_prefers_earliest_separator() {
        let (title, summary) = split_title("The Study - Hale finds: a key");
        assert_eq!(title, "The Study");
        assert_eq!(summary, "Hale finds: a key");
    }

    #[test]
    fn test_split_title_without_summary() {
        assert_eq!(
            split_title("\"A Quiet Death\""),
            ("A Quiet Death".to_string(), String::new())
        );
    }
}
