use serde::{Deserialize, Serialize};

/// Lexical resources consulted by the rule generators.
///
/// Defaults embed the hand-curated Spanish-Yine seed lists the rules were
/// authored against. The shape is serde-deserializable so collaborators can
/// swap in corpus-specific lists without touching the generators.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Lexicon {
    /// Possessive-state suffixes stripped by the omission rule, hyphen
    /// included.
    pub possessive_suffixes: Vec<String>,
    /// Yine determiners eligible for NP-order swaps.
    pub yine_determiners: Vec<String>,
    /// Spanish determiners available for injection.
    pub spanish_determiners: Vec<String>,
    /// Adjective stems licensed for agreement flips. An empty list disables
    /// the whitelist and lets any suffix-bearing token through.
    pub adjective_stems: Vec<String>,
    /// Paired agreement endings flipped masc<->fem.
    pub agreement_pairs: Vec<AgreementPair>,
    /// Function words never treated as nouns.
    pub stopwords: Vec<String>,
    /// Verbal endings that disqualify a token from noun-hood.
    pub verbal_suffixes: Vec<String>,
}

/// One masc/fem agreement ending pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgreementPair {
    /// Masculine ending.
    pub masc: String,
    /// Feminine ending.
    pub fem: String,
}

fn owned(entries: &[&str]) -> Vec<String> {
    entries.iter().map(|entry| entry.to_string()).collect()
}

impl Default for Lexicon {
    fn default() -> Self {
        Self {
            possessive_suffixes: owned(&["-tu", "-ta", "-ne"]),
            yine_determiners: owned(&["satu", "sato", "eklu", "wale"]),
            spanish_determiners: owned(&[
                "el", "la", "los", "las", "un", "una", "unos", "unas",
            ]),
            adjective_stems: owned(&["pixka", "mtura", "koshpa", "yompi"]),
            agreement_pairs: vec![
                AgreementPair {
                    masc: "lu".to_string(),
                    fem: "lo".to_string(),
                },
                AgreementPair {
                    masc: "tu".to_string(),
                    fem: "to".to_string(),
                },
            ],
            stopwords: owned(&["wa", "ga", "gi", "wane", "pa"]),
            verbal_suffixes: owned(&["ta", "na", "kalu", "luwa", "tka"]),
        }
    }
}

impl Lexicon {
    /// Heuristic noun-hood test used for NP-context gating and injection
    /// anchoring. `token` must already be lowercased.
    pub fn looks_like_noun(&self, token: &str) -> bool {
        if token.chars().count() < 3 {
            return false;
        }
        if self.stopwords.iter().any(|word| word == token) {
            return false;
        }
        if self.yine_determiners.iter().any(|det| det == token) {
            return false;
        }
        !self
            .verbal_suffixes
            .iter()
            .any(|suffix| token.ends_with(suffix.as_str()))
    }

    /// True when `token` (lowercased) is a known Spanish determiner.
    pub fn is_spanish_determiner(&self, token: &str) -> bool {
        self.spanish_determiners.iter().any(|det| det == token)
    }

    /// True when `token` (lowercased) is a known Yine determiner.
    pub fn is_yine_determiner(&self, token: &str) -> bool {
        self.yine_determiners.iter().any(|det| det == token)
    }

    /// True when `stem` (lowercased, suffix stripped) is a licensed
    /// adjective. With an empty whitelist every stem qualifies.
    pub fn is_adjective_stem(&self, stem: &str) -> bool {
        self.adjective_stems.is_empty() || self.adjective_stems.iter().any(|adj| adj == stem)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noun_heuristic_rejects_function_words() {
        let lexicon = Lexicon::default();
        assert!(lexicon.looks_like_noun("chixra"));
        assert!(lexicon.looks_like_noun("numa"));
        assert!(!lexicon.looks_like_noun("wane"));
        assert!(!lexicon.looks_like_noun("satu"));
        assert!(!lexicon.looks_like_noun("wa"));
        // verbal ending
        assert!(!lexicon.looks_like_noun("yimata"));
    }

    #[test]
    fn empty_whitelist_licenses_any_stem() {
        let mut lexicon = Lexicon::default();
        assert!(!lexicon.is_adjective_stem("numa"));
        lexicon.adjective_stems.clear();
        assert!(lexicon.is_adjective_stem("numa"));
    }
}
