//! Bullet rewriting through the generative oracle.
//!
//! Fail-open: any oracle failure returns the original bullet untouched, so a
//! slow or absent oracle never blocks extraction.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::{debug, warn};

use crate::extraction::prompts::build_rewrite_prompt;
use crate::keywords::KeywordDatabase;
use crate::llm_client::{GenerateOptions, TextOracle};
use crate::models::language::{Industry, Language};
use crate::models::record::JobEntry;

/// Preferred verbs quoted in each rewrite prompt.
const MAX_PROMPT_VERBS: usize = 5;

const REWRITE_OPTIONS: GenerateOptions = GenerateOptions {
    temperature: 0.5,
    num_predict: Some(60),
};

#[derive(Clone)]
pub struct BulletRewriter {
    oracle: Arc<dyn TextOracle>,
    keywords: Arc<KeywordDatabase>,
    concurrency: usize,
}

impl BulletRewriter {
    pub fn new(oracle: Arc<dyn TextOracle>, keywords: Arc<KeywordDatabase>, concurrency: usize) -> Self {
        Self {
            oracle,
            keywords,
            concurrency: concurrency.max(1),
        }
    }

    /// Preferred action verbs for the industry and language.
    pub fn action_verbs(&self, industry: Industry, lang: Language) -> &[String] {
        &self.keywords.lexicon(industry, lang).action_verbs
    }

    /// Rewrites one bullet. Returns the trimmed oracle answer, or `bullet`
    /// exactly as given when the oracle fails.
    pub async fn rewrite(&self, bullet: &str, industry: Industry, lang: Language) -> String {
        let verbs: Vec<String> = self
            .action_verbs(industry, lang)
            .iter()
            .take(MAX_PROMPT_VERBS)
            .cloned()
            .collect();
        let prompt = build_rewrite_prompt(bullet, industry, lang, &verbs);

        match self.oracle.generate(&prompt, REWRITE_OPTIONS).await {
            Ok(text) => {
                let improved = text.trim();
                if improved.is_empty() {
                    bullet.to_string()
                } else {
                    debug!("Rewrote bullet ({} → {} chars)", bullet.len(), improved.len());
                    improved.to_string()
                }
            }
            Err(e) => {
                warn!("Bullet rewrite failed, keeping original: {e}");
                bullet.to_string()
            }
        }
    }

    /// Rewrites every bullet of every job in place. Up to `concurrency` calls
    /// run at once; each bullet is written back to its original position.
    pub async fn rewrite_jobs(&self, jobs: &mut [JobEntry], industry: Industry, lang: Language) {
        let pending: Vec<(usize, usize, String)> = jobs
            .iter()
            .enumerate()
            .flat_map(|(j, job)| {
                job.bullets
                    .iter()
                    .enumerate()
                    .map(move |(b, text)| (j, b, text.clone()))
            })
            .collect();

        if pending.is_empty() {
            return;
        }

        let rewritten: Vec<(usize, usize, String)> = stream::iter(pending)
            .map(|(j, b, text)| async move {
                let improved = self.rewrite(&text, industry, lang).await;
                (j, b, improved)
            })
            .buffered(self.concurrency)
            .collect()
            .await;

        for (j, b, text) in rewritten {
            jobs[j].bullets[b] = text;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keywords::tests::sample_db;
    use crate::llm_client::tests::{FailingOracle, ScriptedOracle, ShoutingOracle};
    use crate::llm_client::OracleError;

    fn rewriter(oracle: Arc<dyn TextOracle>) -> BulletRewriter {
        BulletRewriter::new(oracle, Arc::new(sample_db()), 4)
    }

    #[tokio::test]
    async fn test_failed_oracle_returns_bullet_unchanged() {
        let r = rewriter(Arc::new(FailingOracle));
        let bullet = "  Led a team of 5 \"quoted\" ";
        assert_eq!(r.rewrite(bullet, Industry::Tech, Language::En).await, bullet);
    }

    #[tokio::test]
    async fn test_success_is_trimmed() {
        let oracle = Arc::new(ScriptedOracle::new(vec![Ok(
            "\n  Led a 5-person team to ship X  \n".to_string(),
        )]));
        let r = rewriter(oracle.clone());
        let out = r.rewrite("Led a team of 5", Industry::Tech, Language::En).await;
        assert_eq!(out, "Led a 5-person team to ship X");
        assert_eq!(oracle.calls(), 1);
    }

    #[tokio::test]
    async fn test_prompt_carries_industry_verbs() {
        let oracle = Arc::new(ScriptedOracle::new(vec![Ok("ok".to_string())]));
        let r = rewriter(oracle.clone());
        r.rewrite("Closed books", Industry::Finance, Language::En).await;
        let prompts = oracle.prompts.lock().unwrap();
        assert!(prompts[0].contains("Audited, Forecasted"));
        assert!(prompts[0].contains("Industry: finance"));
    }

    #[tokio::test]
    async fn test_whitespace_answer_keeps_original() {
        let oracle = Arc::new(ScriptedOracle::new(vec![Ok("   ".to_string())]));
        let r = rewriter(oracle);
        assert_eq!(r.rewrite("Kept", Industry::Tech, Language::En).await, "Kept");
    }

    #[tokio::test]
    async fn test_rewrite_jobs_preserves_order_within_jobs() {
        let r = rewriter(Arc::new(ShoutingOracle));
        let mut jobs = vec![
            JobEntry {
                title: "A".to_string(),
                company: "X".to_string(),
                dates: "2020".to_string(),
                bullets: vec!["first".to_string(), "second".to_string(), "third".to_string()],
            },
            JobEntry {
                title: "B".to_string(),
                company: "Y".to_string(),
                dates: "2019".to_string(),
                bullets: vec!["fourth".to_string()],
            },
        ];

        r.rewrite_jobs(&mut jobs, Industry::Tech, Language::En).await;

        assert_eq!(jobs[0].bullets, ["FIRST", "SECOND", "THIRD"]);
        assert_eq!(jobs[1].bullets, ["FOURTH"]);
    }

    #[tokio::test]
    async fn test_rewrite_jobs_mixed_failures_fall_back_per_bullet() {
        let oracle = Arc::new(ScriptedOracle::new(vec![
            Ok("Better one".to_string()),
            Err(OracleError::EmptyResponse),
        ]));
        let r = BulletRewriter::new(oracle, Arc::new(sample_db()), 1);
        let mut jobs = vec![JobEntry {
            title: "A".to_string(),
            company: "X".to_string(),
            dates: "2020".to_string(),
            bullets: vec!["one".to_string(), "two".to_string()],
        }];

        r.rewrite_jobs(&mut jobs, Industry::Tech, Language::En).await;
        assert_eq!(jobs[0].bullets, ["Better one", "two"]);
    }
}
