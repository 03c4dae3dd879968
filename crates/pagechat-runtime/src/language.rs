//! Word-list language detection (Italian vs English).

use serde::{Deserialize, Serialize};

/// Language of the panel's UI strings and system prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    It,
    En,
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::It => write!(f, "it"),
            Self::En => write!(f, "en"),
        }
    }
}

const ITALIAN_WORDS: &[&str] = &[
    "il", "lo", "la", "gli", "le", "un", "una", "uno", "di", "da", "con", "su", "per", "tra",
    "fra", "che", "cosa", "come", "dove", "quando", "perché", "perche", "chi", "quale",
    "questo", "questa", "questi", "queste", "quello", "quella", "pagina", "dice", "sono",
    "è", "non", "mi", "ti", "ci", "del", "della", "dello", "dei", "delle", "al", "alla",
    "nel", "nella", "ma", "anche", "più", "molto", "puoi", "riassumi", "spiega", "grazie",
    "ciao", "articolo", "parla", "vuol", "dire", "sito",
];

const ENGLISH_WORDS: &[&str] = &[
    "the", "a", "an", "of", "to", "on", "for", "with", "what", "is", "are", "was", "were",
    "this", "that", "these", "those", "how", "why", "where", "when", "who", "which", "page",
    "does", "do", "can", "could", "you", "me", "it", "and", "or", "but", "not", "please",
    "summarize", "summary", "explain", "thanks", "hello", "about", "article", "say", "says",
    "mean", "site", "weather", "today",
];

/// Pick the language of `message`.
///
/// Whitespace-separated, lower-cased tokens are counted against both word
/// lists; Italian wins ties, including when nothing matches.
pub fn detect_language(message: &str) -> Language {
    let (mut italian, mut english) = (0usize, 0usize);
    for token in message.split_whitespace() {
        let word = token
            .trim_matches(|c: char| !c.is_alphanumeric())
            .to_lowercase();
        if ITALIAN_WORDS.contains(&word.as_str()) {
            italian += 1;
        }
        if ENGLISH_WORDS.contains(&word.as_str()) {
            english += 1;
        }
    }

    if italian >= english {
        Language::It
    } else {
        Language::En
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english() {
        assert_eq!(detect_language("what is the weather today"), Language::En);
        assert_eq!(detect_language("Can you SUMMARIZE this page?"), Language::En);
    }

    #[test]
    fn test_italian() {
        assert_eq!(detect_language("che cosa dice questa pagina"), Language::It);
        assert_eq!(detect_language("Riassumi l'articolo, per favore."), Language::It);
    }

    #[test]
    fn test_tie_defaults_to_italian() {
        assert_eq!(detect_language(""), Language::It);
        assert_eq!(detect_language("xyzzy plugh"), Language::It);
        assert_eq!(detect_language("the pagina"), Language::It);
    }
}
