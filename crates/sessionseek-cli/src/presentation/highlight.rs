use owo_colors::OwoColorize;
use regex::Regex;

/// Turns highlight markers in snippets into terminal styling.
pub struct Highlighter {
    pattern: Option<Regex>,
}

impl Highlighter {
    /// `None` pattern leaves snippets untouched, markers included.
    pub fn new(open: &str, close: &str, color: bool) -> Self {
        let pattern = if color && !open.is_empty() && !close.is_empty() {
            Regex::new(&format!(
                "(?s){}(.*?){}",
                regex::escape(open),
                regex::escape(close)
            ))
            .ok()
        } else {
            None
        };
        Self { pattern }
    }

    pub fn plain() -> Self {
        Self { pattern: None }
    }

    pub fn apply(&self, snippet: &str) -> String {
        match &self.pattern {
            Some(pattern) => pattern
                .replace_all(snippet, |caps: &regex::Captures<'_>| {
                    let term: &str = &caps[1];
                    term.bold().yellow().to_string()
                })
                .into_owned(),
            None => snippet.to_string(),
        }
    }
}
