//! Industry classification by keyword hits. Pure and deterministic for a
//! given keyword table.

use serde::Serialize;

use crate::keywords::KeywordDatabase;
use crate::models::language::{Industry, Language};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndustryScore {
    pub industry: Industry,
    pub score: u32,
}

/// Scores every known industry, in `Industry::ALL` order.
/// Each keyword counts at most once, however often it occurs.
pub fn score_industries(text: &str, lang: Language, db: &KeywordDatabase) -> Vec<IndustryScore> {
    let text_lower = text.to_lowercase();

    Industry::ALL
        .into_iter()
        .map(|industry| {
            let score = db
                .scoring_lexicon(industry, lang)
                .keywords
                .iter()
                .map(|kw| kw.trim().to_lowercase())
                .filter(|kw| !kw.is_empty() && text_lower.contains(kw.as_str()))
                .count() as u32;
            IndustryScore { industry, score }
        })
        .collect()
}

/// Best-scoring industry. The first industry to reach the maximum wins ties;
/// with no hits at all the default industry is returned.
pub fn classify(text: &str, lang: Language, db: &KeywordDatabase) -> Industry {
    pick_best(&score_industries(text, lang, db))
}

pub fn pick_best(scores: &[IndustryScore]) -> Industry {
    let mut best: Option<&IndustryScore> = None;
    for s in scores {
        if s.score > best.map(|b| b.score).unwrap_or(0) {
            best = Some(s);
        }
    }
    best.map(|b| b.industry).unwrap_or(Industry::DEFAULT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keywords::tests::sample_db;

    #[test]
    fn test_finance_text_classifies_as_finance() {
        let db = sample_db();
        let text = "Led the annual audit and budget forecasting under IFRS.";
        assert_eq!(classify(text, Language::En, &db), Industry::Finance);
    }

    #[test]
    fn test_repeated_keyword_counts_once() {
        let db = sample_db();
        let scores = score_industries("python python PYTHON python", Language::En, &db);
        assert_eq!(scores[0], IndustryScore { industry: Industry::Tech, score: 1 });
    }

    #[test]
    fn test_no_hits_returns_default() {
        let db = sample_db();
        assert_eq!(classify("Gardening and poetry", Language::En, &db), Industry::DEFAULT);
        assert_eq!(classify("", Language::En, &KeywordDatabase::default()), Industry::DEFAULT);
    }

    #[test]
    fn test_tie_goes_to_first_industry_in_order() {
        let db = sample_db();
        // one tech hit (Docker), one healthcare hit (Patient)
        let text = "Docker for patient records";
        assert_eq!(classify(text, Language::En, &db), Industry::Tech);

        let scores = [
            IndustryScore { industry: Industry::Tech, score: 0 },
            IndustryScore { industry: Industry::Finance, score: 2 },
            IndustryScore { industry: Industry::Healthcare, score: 2 },
        ];
        assert_eq!(pick_best(&scores), Industry::Finance);
    }

    #[test]
    fn test_classification_is_deterministic() {
        let db = sample_db();
        let text = "Clinical EHR rollout, Python scripts, patient triage";
        let first = classify(text, Language::En, &db);
        for _ in 0..20 {
            assert_eq!(classify(text, Language::En, &db), first);
        }
        assert_eq!(first, Industry::Healthcare);
    }

    #[test]
    fn test_missing_language_scores_against_english() {
        let db = sample_db();
        assert_eq!(classify("Audit und Budget", Language::De, &db), Industry::Finance);
    }
}
