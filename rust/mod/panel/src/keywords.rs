//! Department keyword matching on product names.
//!
//! Names and keywords are compared after [`normalize_name`]: accents
//! stripped, lowercased, whitespace collapsed. So "Acém  Moído" and
//! "acem moido" are the same name.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

pub fn normalize_name(name: &str) -> String {
    let folded: String = name
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Trim keywords and drop the blank ones, keeping order.
pub fn clean_keywords(keywords: Vec<String>) -> Vec<String> {
    keywords
        .into_iter()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .collect()
}

/// Built-in keywords for the stock department codes, used when a
/// department has none configured.
pub fn default_keywords(code: &str) -> &'static [&'static str] {
    match code {
        "ACG" => &[
            "carne", "boi", "porco", "frango", "linguiça", "costela", "picanha", "alcatra",
            "maminha", "patinho", "acém", "músculo",
        ],
        "PAD" => &[
            "pão", "bolo", "torta", "biscoito", "doce", "salgado", "croissant", "sonho",
            "rosquinha", "broa",
        ],
        "HRT" => &[
            "alface", "tomate", "cebola", "batata", "cenoura", "abobrinha", "pepino",
            "pimentão", "banana", "maçã", "laranja", "limão",
        ],
        _ => &[],
    }
}

/// Decides whether a product name belongs to a department.
///
/// Exact mode matches the whole normalized name against a keyword;
/// otherwise any keyword contained in the name matches.
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    keywords: Vec<String>,
    exact: bool,
}

impl KeywordMatcher {
    pub fn new<S: AsRef<str>>(keywords: &[S], exact: bool) -> Self {
        let mut normalized: Vec<String> = keywords
            .iter()
            .map(|k| normalize_name(k.as_ref()))
            .filter(|k| !k.is_empty())
            .collect();
        normalized.sort();
        normalized.dedup();
        Self {
            keywords: normalized,
            exact,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    pub fn matches(&self, name: &str) -> bool {
        let name = normalize_name(name);
        if self.exact {
            self.keywords.binary_search(&name).is_ok()
        } else {
            self.keywords.iter().any(|k| name.contains(k.as_str()))
        }
    }
}
