//! Question answering: retrieve, group by theme, summarize, cite.
pub mod composer;
pub mod retriever;
pub mod summarizer;
pub mod themes;

use tracing::info;

use crate::config::Config;
use crate::error::Result;
use crate::indexer::normalize::Boilerplate;
use crate::store::VectorStore;
use composer::{Answer, AnswerComposer};
use retriever::Retriever;
use summarizer::Summarizer;
use themes::ThemeClassifier;

/// Answers questions against an indexed store, one at a time.
pub struct Assistant<'a, S: VectorStore + ?Sized> {
    retriever: Retriever<'a, S>,
    classifier: ThemeClassifier,
    composer: AnswerComposer,
}

impl<'a, S: VectorStore + ?Sized> Assistant<'a, S> {
    pub fn new(store: &'a S, config: &Config) -> Result<Self> {
        config.validate()?;
        let boilerplate = Boilerplate::new(&config.header_patterns)?;

        let classifier = ThemeClassifier::new(
            &config.themes,
            config.keyword_match,
            &config.catch_all_theme,
            boilerplate.clone(),
        )?;
        let summarizer = Summarizer::new(
            config.max_lines_per_theme,
            config.min_sentence_chars,
            config.max_sentence_chars,
            &config.boilerplate_phrases,
            boilerplate,
        );
        let composer = AnswerComposer::new(&config.theme_order, config.merge_hits, summarizer);

        Ok(Self {
            retriever: Retriever::new(store, config.search_top_k),
            classifier,
            composer,
        })
    }

    pub fn ask(&self, question: &str) -> Result<Answer> {
        let hits = self.retriever.retrieve(question)?;
        let buckets = self.classifier.classify(&hits);
        info!(
            "Answering with {} hits across {} themes",
            hits.len(),
            buckets.len()
        );
        Ok(self.composer.compose(question, &buckets))
    }
}
