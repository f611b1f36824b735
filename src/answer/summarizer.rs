use crate::indexer::normalize::{Boilerplate, normalize};

const ELLIPSIS: char = '…';

/// Extractive summary: the first few content sentences of a text.
#[derive(Debug, Clone)]
pub struct Summarizer {
    pub max_lines: usize,
    pub min_chars: usize,
    pub max_chars: usize,
    /// Lower-cased phrases that disqualify a sentence.
    denylist: Vec<String>,
    boilerplate: Boilerplate,
}

impl Summarizer {
    pub fn new(
        max_lines: usize,
        min_chars: usize,
        max_chars: usize,
        denylist: &[String],
        boilerplate: Boilerplate,
    ) -> Self {
        Self {
            max_lines,
            min_chars,
            max_chars,
            denylist: denylist.iter().map(|p| p.to_lowercase()).collect(),
            boilerplate,
        }
    }

    fn is_denylisted(&self, sentence: &str) -> bool {
        let lower = sentence.to_lowercase();
        self.denylist.iter().any(|p| lower.contains(p.as_str()))
    }

    /// Up to `max_lines` sentences of at least `min_chars` characters that
    /// avoid the denylist, each cut to `max_chars`.
    ///
    /// Falls back to the head of the text when no sentence qualifies. Only
    /// empty or whitespace-only input yields no lines.
    pub fn summarize(&self, text: &str) -> Vec<String> {
        let raw = normalize(text);
        if raw.is_empty() {
            return Vec::new();
        }
        let cleaned = self.boilerplate.strip(&raw);
        if cleaned.is_empty() {
            // Nothing but page banners
            return vec![self.fallback(&raw)];
        }

        let mut lines = Vec::new();
        for sentence in split_sentences(&cleaned) {
            let sentence = normalize(sentence);
            if sentence.chars().count() < self.min_chars {
                continue;
            }
            if self.is_denylisted(&sentence) {
                continue;
            }

            lines.push(truncate(&sentence, self.max_chars));
            if lines.len() >= self.max_lines {
                break;
            }
        }

        if lines.is_empty() {
            lines.push(self.fallback(&cleaned));
        }
        lines
    }

    /// Head of the text with denylisted phrases removed, unless nothing
    /// would be left.
    fn fallback(&self, cleaned: &str) -> String {
        let mut source = cleaned.to_string();
        for phrase in self.denylist.iter().filter(|p| !p.is_empty()) {
            source = remove_ignore_case(&source, phrase);
        }
        let source = normalize(&source);
        let source = if source.is_empty() {
            cleaned
        } else {
            source.as_str()
        };

        let head: String = source.chars().take(self.max_chars).collect();
        let head = head.trim_end();
        if source.chars().count() > self.max_chars {
            format!("{head}{ELLIPSIS}")
        } else {
            head.to_string()
        }
    }
}

/// Splits after `.`, `!` or `?` when followed by whitespace.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut prev_terminal = false;

    for (i, c) in text.char_indices() {
        if c.is_whitespace() && prev_terminal {
            sentences.push(&text[start..i]);
            start = i;
        }
        prev_terminal = matches!(c, '.' | '!' | '?');
    }
    sentences.push(&text[start..]);

    sentences
}

/// Keeps `max_chars - 3` characters plus an ellipsis when too long.
fn truncate(sentence: &str, max_chars: usize) -> String {
    if sentence.chars().count() <= max_chars {
        return sentence.to_string();
    }
    let head: String = sentence.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}{ELLIPSIS}", head.trim_end())
}

/// Removes every case-insensitive occurrence of a lower-cased `phrase`.
fn remove_ignore_case(text: &str, phrase: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    loop {
        let found = rest.char_indices().find(|(i, _)| {
            rest[*i..]
                .chars()
                .flat_map(char::to_lowercase)
                .take(phrase.chars().count())
                .eq(phrase.chars())
        });
        match found {
            Some((i, _)) => {
                out.push_str(&rest[..i]);
                out.push(' ');
                // Skip as many source chars as the phrase has
                let skip = rest[i..]
                    .char_indices()
                    .nth(phrase.chars().count())
                    .map_or(rest.len() - i, |(j, _)| j);
                rest = &rest[i + skip..];
            }
            None => {
                out.push_str(rest);
                return out;
            }
        }
    }
}
