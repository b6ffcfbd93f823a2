//! Command line assembly
//!
//! A line is an ordered list of words plus an optional trailing comment.
//! Comments are sanitized once, here, so text from the host can never
//! open or close a Grbl comment early.

/// Characters Grbl treats as comment delimiters
const COMMENT_DELIMITERS: [char; 3] = ['(', ')', ';'];

/// Remove comment delimiters and surrounding whitespace from `text`
pub fn strip_comment(text: &str) -> String {
    text.chars()
        .filter(|c| !COMMENT_DELIMITERS.contains(c))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Builder for one output line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineBuilder {
    words: Vec<String>,
    comment: Option<String>,
}

impl LineBuilder {
    /// Start an empty line
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a line holding only a comment
    pub fn comment_only(text: &str) -> Self {
        Self::new().comment(text)
    }

    /// Append a word; blank words are dropped
    pub fn word(mut self, word: impl AsRef<str>) -> Self {
        let word = word.as_ref().trim();
        if !word.is_empty() {
            self.words.push(word.to_string());
        }
        self
    }

    /// Append a word that a modal register may have suppressed
    pub fn opt_word(self, word: Option<String>) -> Self {
        match word {
            Some(word) => self.word(word),
            None => self,
        }
    }

    /// Set the trailing comment; a comment that is blank after
    /// sanitizing is dropped
    pub fn comment(mut self, text: &str) -> Self {
        let text = strip_comment(text);
        self.comment = (!text.is_empty()).then_some(text);
        self
    }

    /// Whether the line has nothing to write
    pub fn is_empty(&self) -> bool {
        self.words.is_empty() && self.comment.is_none()
    }

    /// Render the line, or `None` if it is empty
    pub fn build(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        let mut line = self.words.join(" ");
        if let Some(comment) = &self.comment {
            if !line.is_empty() {
                line.push(' ');
            }
            line.push('(');
            line.push_str(comment);
            line.push(')');
        }
        Some(line)
    }
}
