//! Prompt text for each workflow stage.
//!
//! Every prompt restates the brief; later stages also carry the idea and the
//! outline so each request stands on its own.

use crate::{ChapterDraft, ChapterPlan, MysteryBrief, Outline};
use std::fmt::Write;

/// System prompt shared by every stage.
pub const SYSTEM_PROMPT: &str = "You are an accomplished ghost-writer of classic murder mysteries. \
You play fair with the reader: every clue needed to identify the culprit appears on the page \
before the reveal, red herrings are plausible, and the solution follows from the evidence. \
Write vivid, publishable prose and follow formatting instructions exactly.";

/// Marker the idea prompt asks the model to start with.
pub const TITLE_PREFIX: &str = "Title:";

/// The brief rendered as a bullet list.
pub fn brief_context(brief: &MysteryBrief) -> String {
    let mut out = String::from("Author's brief:\n");
    if let Some(title) = brief.title() {
        let _ = writeln!(out, "- Working title: {}", title);
    }
    let _ = writeln!(out, "- Premise: {}", brief.premise().trim());
    if let Some(setting) = brief.setting() {
        let _ = writeln!(out, "- Setting: {}", setting);
    }
    if let Some(era) = brief.era() {
        let _ = writeln!(out, "- Era: {}", era);
    }
    if let Some(tone) = brief.tone() {
        let _ = writeln!(out, "- Tone: {}", tone);
    }
    let _ = writeln!(
        out,
        "- Length: {} chapters of about {} words each",
        brief.chapter_count(),
        brief.words_per_chapter()
    );

    if !brief.cast().is_empty() {
        out.push_str("- Cast:\n");
        for member in brief.cast() {
            let _ = write!(out, "  - {} ({})", member.name(), member.role());
            if let Some(description) = member.description() {
                let _ = write!(out, ": {}", description);
            }
            out.push('\n');
        }
    }

    if let Some(notes) = brief.notes().as_deref().filter(|n| !n.trim().is_empty()) {
        let _ = write!(out, "\nReference notes from the author:\n{}\n", notes.trim());
    }
    out
}

/// Stage 1: develop the premise into a full mystery concept.
pub fn idea_prompt(brief: &MysteryBrief) -> String {
    format!(
        "{context}\n\
         Develop this into a complete murder-mystery concept. Begin your answer with a line \
         of the form \"{prefix} <title>\". Then describe: the victim and how they die; the \
         detective; at least four suspects with motives and secrets; the true culprit, their \
         motive and method; the key clues and where each is discovered; the red herrings; and \
         how the detective finally proves the solution.",
        context = brief_context(brief),
        prefix = TITLE_PREFIX,
    )
}

/// Stage 2: turn the concept into a chapter-by-chapter outline.
pub fn outline_prompt(brief: &MysteryBrief, idea: &str) -> String {
    format!(
        "{context}\n\
         Mystery concept:\n{idea}\n\n\
         Write a chapter-by-chapter outline with exactly {count} chapters. Put each chapter on \
         its own line in the form \"Chapter N: Title - Summary\", where the summary states what \
         happens, which clues are planted and which suspicions shift. Do not add any other \
         numbered lines.",
        context = brief_context(brief),
        idea = idea.trim(),
        count = brief.chapter_count(),
    )
}

/// Stage 3: draft a single chapter.
pub fn chapter_prompt(
    brief: &MysteryBrief,
    idea: &str,
    outline: &Outline,
    plan: &ChapterPlan,
) -> String {
    let mut plan_lines = String::new();
    for chapter in outline.chapters() {
        let marker = if chapter.number() == plan.number() {
            " <= this chapter"
        } else {
            ""
        };
        let _ = writeln!(
            plan_lines,
            "Chapter {}: {} - {}{}",
            chapter.number(),
            chapter.title(),
            chapter.summary(),
            marker
        );
    }

    format!(
        "{context}\n\
         Mystery concept:\n{idea}\n\n\
         Full outline:\n{plan_lines}\n\
         Write Chapter {number} of {total}, \"{title}\", in full prose of about {words} words. \
         Cover: {summary}\n\
         Stay consistent with the outline; do not reveal anything scheduled for a later chapter. \
         Return only the chapter text, without a heading.",
        context = brief_context(brief),
        idea = idea.trim(),
        number = plan.number(),
        total = outline.len(),
        title = plan.title(),
        words = brief.words_per_chapter(),
        summary = plan.summary(),
    )
}

/// Stage 4: editorial critique of the whole draft.
pub fn critique_prompt(brief: &MysteryBrief, idea: &str, chapters: &[&ChapterDraft]) -> String {
    let mut manuscript = String::new();
    for chapter in chapters {
        let _ = write!(
            manuscript,
            "\n## Chapter {}: {}\n\n{}\n",
            chapter.number(),
            chapter.title(),
            chapter.text().trim()
        );
    }

    format!(
        "{context}\n\
         Mystery concept:\n{idea}\n\n\
         Draft manuscript:\n{manuscript}\n\
         Critique this draft as a demanding mystery editor. Assess whether the puzzle plays fair, \
         whether the clues are planted early enough, pacing, character voice and continuity \
         errors. Finish with a prioritised list of concrete revisions, citing chapters.",
        context = brief_context(brief),
        idea = idea.trim(),
    )
}

/// Pull a title out of an idea that starts with [`TITLE_PREFIX`].
pub fn extract_title(idea: &str) -> Option<String> {
    idea.lines()
        .map(|line| line.trim().trim_matches('*').trim())
        .find(|line| !line.is_empty())
        .and_then(|line| {
            let lower = line.to_ascii_lowercase();
            lower
                .starts_with(&TITLE_PREFIX.to_ascii_lowercase())
                .then(|| line[TITLE_PREFIX.len()..].trim().trim_matches(['"', '*']).trim())
        })
        .filter(|title| !title.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CastMember;
    use whodunit_core::CharacterRole;

    fn brief() -> MysteryBrief {
        MysteryBrief::builder()
            .premise("Poison at the vicarage fete")
            .era(Some("1930s".to_string()))
            .chapter_count(3usize)
            .cast(vec![CastMember::new(
                "Miss Plum",
                CharacterRole::Detective,
                Some("retired schoolmistress".to_string()),
            )])
            .notes(Some("The vicar keeps bees.".to_string()))
            .build()
            .unwrap()
    }

    #[test]
    fn test_brief_context_lists_everything() {
        let context = brief_context(&brief());
        assert!(context.contains("Premise: Poison at the vicarage fete"));
        assert!(context.contains("Era: 1930s"));
        assert!(context.contains("Miss Plum (detective): retired schoolmistress"));
        assert!(context.contains("The vicar keeps bees."));
        assert!(!context.contains("Setting:"));
    }

    #[test]
    fn test_outline_prompt_requests_chapter_count() {
        let prompt = outline_prompt(&brief(), "An idea");
        assert!(prompt.contains("exactly 3 chapters"));
        assert!(prompt.contains("Chapter N: Title - Summary"));
    }

    #[test]
    fn test_chapter_prompt_marks_current_chapter() {
        let outline = Outline::from_chapters(
            "",
            vec![
                ChapterPlan::new(1, "Arrival", "Plum arrives"),
                ChapterPlan::new(2, "The Fete", "The vicar collapses"),
            ],
        );
        let prompt = chapter_prompt(&brief(), "idea", &outline, &outline.chapters()[1]);
        assert!(prompt.contains("Chapter 2: The Fete - The vicar collapses <= this chapter"));
        assert!(prompt.contains("Write Chapter 2 of 2"));
    }

    #[test]
    fn test_extract_title() {
        assert_eq!(
            extract_title("**Title: \"Stung\"**\n\nThe vicar..."),
            Some("Stung".to_string())
        );
        assert_eq!(extract_title("No title line here"), None);
        assert_eq!(extract_title("Title:   "), None);
    }
}
