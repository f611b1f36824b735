use regex::Regex;

use crate::config::{KeywordMatch, ThemeConfig};
use crate::error::RagError;
use crate::indexer::normalize::Boilerplate;
use crate::models::RetrievalHit;

/// Hits grouped by theme, with themes kept in first-observation order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThemeBuckets {
    buckets: Vec<ThemeBucket>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeBucket {
    pub theme: String,
    pub hits: Vec<RetrievalHit>,
}

impl ThemeBuckets {
    pub fn new() -> Self {
        Self::default()
    }

    /// The bucket for `theme`, created empty on first access.
    pub fn bucket_mut(&mut self, theme: &str) -> &mut Vec<RetrievalHit> {
        let idx = match self.buckets.iter().position(|b| b.theme == theme) {
            Some(idx) => idx,
            None => {
                self.buckets.push(ThemeBucket {
                    theme: theme.to_string(),
                    hits: Vec::new(),
                });
                self.buckets.len() - 1
            }
        };
        &mut self.buckets[idx].hits
    }

    pub fn push(&mut self, theme: &str, hit: RetrievalHit) {
        self.bucket_mut(theme).push(hit);
    }

    pub fn get(&self, theme: &str) -> Option<&[RetrievalHit]> {
        self.buckets
            .iter()
            .find(|b| b.theme == theme)
            .map(|b| b.hits.as_slice())
    }

    /// Theme names in the order they were first observed.
    pub fn themes(&self) -> impl Iterator<Item = &str> {
        self.buckets.iter().map(|b| b.theme.as_str())
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

enum Matcher {
    Substring(String),
    Word(Regex),
}

impl Matcher {
    fn is_match(&self, lower: &str) -> bool {
        match self {
            Matcher::Substring(kw) => lower.contains(kw.as_str()),
            Matcher::Word(re) => re.is_match(lower),
        }
    }
}

struct Theme {
    name: String,
    matchers: Vec<Matcher>,
}

/// Assigns each hit to the theme whose keywords it mentions most.
pub struct ThemeClassifier {
    themes: Vec<Theme>,
    catch_all: String,
    boilerplate: Boilerplate,
}

impl ThemeClassifier {
    pub fn new(
        taxonomy: &[ThemeConfig],
        mode: KeywordMatch,
        catch_all: &str,
        boilerplate: Boilerplate,
    ) -> Result<Self, RagError> {
        let themes = taxonomy
            .iter()
            .map(|t| -> Result<Theme, RagError> {
                let matchers = t
                    .keywords
                    .iter()
                    .map(|kw| {
                        let kw = kw.to_lowercase();
                        match mode {
                            KeywordMatch::Substring => Ok(Matcher::Substring(kw)),
                            KeywordMatch::Word => {
                                Regex::new(&format!(r"\b{}\b", regex::escape(&kw)))
                                    .map(Matcher::Word)
                                    .map_err(|e| {
                                        RagError::Configuration(format!(
                                            "keyword {kw:?} of theme {:?}: {e}",
                                            t.name
                                        ))
                                    })
                            }
                        }
                    })
                    .collect::<Result<Vec<_>, RagError>>()?;
                Ok(Theme {
                    name: t.name.clone(),
                    matchers,
                })
            })
            .collect::<Result<Vec<_>, RagError>>()?;

        Ok(Self {
            themes,
            catch_all: catch_all.to_string(),
            boilerplate,
        })
    }

    /// Per-theme keyword hit counts for `text`, taxonomy order, zeros omitted.
    pub fn scores(&self, text: &str) -> Vec<(&str, usize)> {
        let lower = text.to_lowercase();
        self.themes
            .iter()
            .map(|t| {
                let count = t.matchers.iter().filter(|m| m.is_match(&lower)).count();
                (t.name.as_str(), count)
            })
            .filter(|(_, count)| *count > 0)
            .collect()
    }

    /// Best theme for `text`; ties go to the theme declared first.
    pub fn best_theme(&self, text: &str) -> &str {
        let mut best: Option<(&str, usize)> = None;
        for (name, count) in self.scores(text) {
            if best.is_none_or(|(_, top)| count > top) {
                best = Some((name, count));
            }
        }
        best.map_or(self.catch_all.as_str(), |(name, _)| name)
    }

    /// Groups hits by theme, preserving retrieval order inside each bucket.
    /// Banners are ignored for scoring; bucketed hits keep their text as retrieved.
    pub fn classify(&self, hits: &[RetrievalHit]) -> ThemeBuckets {
        let mut buckets = ThemeBuckets::new();
        for hit in hits {
            let theme = self.best_theme(&self.boilerplate.strip(&hit.text)).to_string();
            buckets.push(&theme, hit.clone());
        }
        buckets
    }
}
