use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::answer::summarizer::Summarizer;
use crate::answer::themes::ThemeBuckets;

/// One rendered theme: summary lines plus cited pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThemeSection {
    pub theme: String,
    pub lines: Vec<String>,
    /// Sorted, unique, known pages across every hit of the theme.
    pub pages: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Answer {
    pub question: String,
    pub lines_per_theme: usize,
    pub sections: Vec<ThemeSection>,
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Question > {}", self.question)?;
        writeln!(f)?;
        writeln!(
            f,
            "=== SYNTHESIZED ANSWER ({} lines per theme) ===",
            self.lines_per_theme
        )?;
        writeln!(f)?;

        for section in &self.sections {
            writeln!(f, "◆ {}", section.theme)?;
            for line in &section.lines {
                writeln!(f, "  • {line}")?;
            }
            if !section.pages.is_empty() {
                writeln!(f, "  Sources: pages {:?}", section.pages)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Orders themes for a business reader and summarizes each one.
pub struct AnswerComposer {
    theme_order: Vec<String>,
    merge_hits: usize,
    summarizer: Summarizer,
}

impl AnswerComposer {
    pub fn new(theme_order: &[String], merge_hits: usize, summarizer: Summarizer) -> Self {
        Self {
            theme_order: theme_order.to_vec(),
            merge_hits,
            summarizer,
        }
    }

    /// Priority-list themes first, in list order; the rest as first observed.
    pub fn ordered_themes<'b>(&self, buckets: &'b ThemeBuckets) -> Vec<&'b str> {
        let mut ordered: Vec<&'b str> = self
            .theme_order
            .iter()
            .filter_map(|t| buckets.themes().find(|present| *present == t.as_str()))
            .collect();

        for theme in buckets.themes() {
            if !ordered.contains(&theme) {
                ordered.push(theme);
            }
        }
        ordered
    }

    pub fn compose(&self, question: &str, buckets: &ThemeBuckets) -> Answer {
        let sections = self
            .ordered_themes(buckets)
            .into_iter()
            .filter_map(|theme| {
                let hits = buckets.get(theme).filter(|hits| !hits.is_empty())?;

                let merged = hits
                    .iter()
                    .take(self.merge_hits)
                    .map(|h| h.text.as_str())
                    .collect::<Vec<_>>()
                    .join(" ");

                let pages: BTreeSet<u32> = hits.iter().filter_map(|h| h.page).collect();

                Some(ThemeSection {
                    theme: theme.to_string(),
                    lines: self.summarizer.summarize(&merged),
                    pages: pages.into_iter().collect(),
                })
            })
            .collect();

        Answer {
            question: question.to_string(),
            lines_per_theme: self.summarizer.max_lines,
            sections,
        }
    }
}
