use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use glossa_core::LinguisticAnalyzer;
use glossa_types::WordAnalysis;

use crate::analysis::analyze;
use crate::conllu::parse_conllu;
use crate::parser::{AnalyzerError, DependencyParser};

/// German token analysis over a dependency parse.
///
/// Built once at startup and shared; holds no per-request state.
#[derive(Clone)]
pub struct GermanAnalyzer {
    parser: Arc<dyn DependencyParser>,
    timeout: Duration,
}

impl GermanAnalyzer {
    pub fn new(parser: Arc<dyn DependencyParser>, timeout: Duration) -> Self {
        Self { parser, timeout }
    }

    /// Parse `sentence` and analyse the token matching `word`.
    ///
    /// `Ok(None)` means the parse succeeded but no token matched.
    pub async fn try_extract(
        &self,
        word: &str,
        sentence: &str,
    ) -> Result<Option<WordAnalysis>, AnalyzerError> {
        let conllu = tokio::time::timeout(self.timeout, self.parser.parse(sentence))
            .await
            .map_err(|_| AnalyzerError::Timeout)??;

        let word = word.to_string();
        tokio::task::spawn_blocking(move || -> Result<Option<WordAnalysis>, AnalyzerError> {
            let sentences = parse_conllu(&conllu)?;
            Ok(analyze(&sentences, &word))
        })
        .await
        .map_err(|e| AnalyzerError::Worker(e.to_string()))?
    }
}

#[async_trait]
impl LinguisticAnalyzer for GermanAnalyzer {
    fn language_code(&self) -> &str {
        "de"
    }

    async fn extract(&self, word: &str, sentence: &str) -> Option<WordAnalysis> {
        match self.try_extract(word, sentence).await {
            Ok(Some(analysis)) => {
                tracing::debug!(
                    word,
                    lemma = %analysis.lemma,
                    pos = %analysis.pos,
                    parts = ?analysis.parts,
                    "German token analysed"
                );
                Some(analysis)
            }
            Ok(None) => {
                tracing::debug!(word, "No token in the parse matches the word");
                None
            }
            Err(e) => {
                tracing::warn!(word, error = %e, "German analysis failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use glossa_core::lemma::lemma_from_analysis;

    use super::*;
    use crate::conllu::fixtures::{ARTICLE_ADJECTIVE_REFLEXIVE, REFLEXIVE_SEPARABLE, SEPARABLE};

    enum Reply {
        Conllu(&'static str),
        Slow,
        Fail,
    }

    struct StubParser(Reply);

    #[async_trait]
    impl DependencyParser for StubParser {
        async fn parse(&self, _sentence: &str) -> Result<String, AnalyzerError> {
            match &self.0 {
                Reply::Conllu(text) => Ok(text.to_string()),
                Reply::Slow => {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    Ok(String::new())
                }
                Reply::Fail => Err(AnalyzerError::Api("HTTP 503".to_string())),
            }
        }
    }

    fn analyzer(reply: Reply) -> GermanAnalyzer {
        GermanAnalyzer::new(Arc::new(StubParser(reply)), Duration::from_millis(100))
    }

    #[tokio::test]
    async fn test_separable_verb_lemma() {
        let analysis = analyzer(Reply::Conllu(SEPARABLE))
            .extract("stellte", "Er stellte seinen Freund vor.")
            .await
            .unwrap();

        let (lemma, related) = lemma_from_analysis("stellte", &analysis).unwrap();
        assert_eq!(lemma, "vorstellen");
        assert_eq!(related, vec!["stellte", "vor"]);
    }

    #[tokio::test]
    async fn test_reflexive_separable_verb_lemma() {
        let analysis = analyzer(Reply::Conllu(REFLEXIVE_SEPARABLE))
            .extract("stelle", "Ich stelle mich vor.")
            .await
            .unwrap();

        let (lemma, related) = lemma_from_analysis("stelle", &analysis).unwrap();
        assert_eq!(lemma, "sich vorstellen");
        assert_eq!(related, vec!["stelle", "mich", "vor"]);
    }

    #[tokio::test]
    async fn test_article_and_participle_keep_surface_form() {
        let sentence = "Die Tür war geschlossen, und er freute sich.";
        let german = analyzer(Reply::Conllu(ARTICLE_ADJECTIVE_REFLEXIVE));

        let article = german.extract("Die", sentence).await.unwrap();
        assert_eq!(lemma_from_analysis("Die", &article).unwrap().0, "die");

        let adjective = german.extract("geschlossen", sentence).await.unwrap();
        assert_eq!(lemma_from_analysis("geschlossen", &adjective).unwrap().0, "geschlossen");

        let verb = german.extract("freute", sentence).await.unwrap();
        assert_eq!(lemma_from_analysis("freute", &verb).unwrap().0, "sich freuen");
    }

    #[tokio::test]
    async fn test_failures_yield_none() {
        let sentence = "Er stellte seinen Freund vor.";

        assert!(analyzer(Reply::Slow).extract("stellte", sentence).await.is_none());
        assert!(analyzer(Reply::Fail).extract("stellte", sentence).await.is_none());
        assert!(analyzer(Reply::Conllu("1\tkaputt\n")).extract("kaputt", sentence).await.is_none());
        assert!(analyzer(Reply::Conllu(SEPARABLE)).extract("Haus", sentence).await.is_none());
    }

    #[tokio::test]
    async fn test_timeout_is_reported() {
        let err = analyzer(Reply::Slow)
            .try_extract("stellte", "Er stellte seinen Freund vor.")
            .await
            .unwrap_err();
        assert!(matches!(err, AnalyzerError::Timeout));
    }
}
