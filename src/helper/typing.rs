//! Typing animation for chat replies.
//!
//! Works on an already computed reply: a `Typewriter` yields progressively
//! longer frames, and `format_steps` puts `Step N:` markers on their own
//! bulleted lines for the final frame.

use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;

pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(300);

static STEP_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)step\s\d+:").unwrap());

/// Put every `Step N:` marker on a new bulleted line.
pub fn format_steps(text: &str) -> String {
    STEP_MARKER
        .replace_all(text, |caps: &regex::Captures| format!("\n• {}", caps[0].trim()))
        .into_owned()
}

/// Iterator over the frames of a word-by-word reveal.
///
/// Each frame is the previous frame plus a space and the next words, so the
/// first frame starts with a space.
pub struct Typewriter<'a> {
    words: std::str::Split<'a, char>,
    words_per_frame: usize,
    shown: String,
}

impl<'a> Typewriter<'a> {
    pub fn new(text: &'a str) -> Self {
        Self::with_words_per_frame(text, 1)
    }

    /// `words_per_frame` of zero is treated as one.
    pub fn with_words_per_frame(text: &'a str, words_per_frame: usize) -> Self {
        Self {
            words: text.split(' '),
            words_per_frame: words_per_frame.max(1),
            shown: String::with_capacity(text.len() + 1),
        }
    }
}

impl Iterator for Typewriter<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let mut revealed = 0;
        for word in self.words.by_ref().take(self.words_per_frame) {
            self.shown.push(' ');
            self.shown.push_str(word);
            revealed += 1;
        }
        (revealed > 0).then(|| self.shown.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frames_grow_word_by_word() {
        let frames: Vec<String> = Typewriter::new("git init now").collect();
        assert_eq!(frames, [" git", " git init", " git init now"]);
    }

    #[test]
    fn test_last_frame_holds_whole_text() {
        let text = "Initializes a repo.\nSteps:\n1. Run `git init`.";
        let last = Typewriter::new(text).last().unwrap();
        assert_eq!(last.trim_start(), text);
    }

    #[test]
    fn test_multiple_words_per_frame() {
        let frames: Vec<String> = Typewriter::with_words_per_frame("a b c d e", 2).collect();
        assert_eq!(frames, [" a b", " a b c d", " a b c d e"]);
    }

    #[test]
    fn test_zero_words_per_frame_acts_as_one() {
        assert_eq!(Typewriter::with_words_per_frame("a b", 0).count(), 2);
    }

    #[test]
    fn test_empty_text_has_single_blank_frame() {
        let frames: Vec<String> = Typewriter::new("").collect();
        assert_eq!(frames, [" "]);
    }

    #[test]
    fn test_format_steps_bullets_markers() {
        let formatted = format_steps("Do this. Step 1: init. step 2: add.");
        assert_eq!(formatted, "Do this. \n• Step 1: init. \n• step 2: add.");
    }

    #[test]
    fn test_format_steps_leaves_numbered_lists_alone() {
        let text = "Steps:\n1. Run `git status`.";
        assert_eq!(format_steps(text), text);
    }

    #[test]
    fn test_format_steps_requires_digit() {
        assert_eq!(format_steps("next step: push"), "next step: push");
    }
}
