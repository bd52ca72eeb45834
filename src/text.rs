//! Text helpers shared by both adapters.

use unicode_normalization::UnicodeNormalization;

/// Language code for predominantly CJK text.
pub const LANG_CHINESE: &str = "zh-CN";

/// Language code for everything else.
pub const LANG_ENGLISH: &str = "en-US";

/// Share of CJK characters among letters above which text counts as CJK.
const CJK_RATIO_THRESHOLD: f64 = 0.3;

/// Script family of a paragraph, used to pick the sentence delimiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    /// Latin-script text, split on `.`
    English,
    /// CJK text, split on `。`
    Chinese,
}

impl Language {
    /// Language code of this family.
    pub fn code(self) -> &'static str {
        match self {
            Language::English => LANG_ENGLISH,
            Language::Chinese => LANG_CHINESE,
        }
    }
}

/// Detect the script family of a text by its share of CJK characters.
pub fn detect_language(text: &str) -> Language {
    let mut cjk = 0usize;
    let mut letters = 0usize;
    for c in text.chars() {
        if is_spaceless_script_char(c) {
            cjk += 1;
            letters += 1;
        } else if c.is_alphabetic() {
            letters += 1;
        }
    }

    if letters > 0 && cjk as f64 / letters as f64 > CJK_RATIO_THRESHOLD {
        Language::Chinese
    } else {
        Language::English
    }
}

/// Split a paragraph into sentences.
///
/// Latin text breaks after a `.` followed by whitespace or the end of the
/// text, so decimals and abbreviations without a trailing space stay
/// intact. CJK text breaks after every `。`. Delimiters stay attached to
/// their sentence and empty pieces are dropped.
pub fn split_sentences(text: &str, language: Language) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        current.push(c);
        let boundary = match language {
            Language::Chinese => c == '。',
            Language::English => c == '.' && chars.peek().map_or(true, |n| n.is_whitespace()),
        };
        if boundary {
            push_sentence(&mut sentences, &current);
            current.clear();
        }
    }
    push_sentence(&mut sentences, &current);
    sentences
}

fn push_sentence(sentences: &mut Vec<String>, piece: &str) {
    let trimmed = piece.trim();
    if !trimmed.is_empty() && trimmed != "." && trimmed != "。" {
        sentences.push(trimmed.to_string());
    }
}

/// Normalize text for fuzzy equality: NFKC, lowercase, collapsed whitespace.
pub fn normalize_for_compare(text: &str) -> String {
    let folded: String = text.nfkc().collect::<String>().to_lowercase();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Uppercase the first letter of every whitespace-separated word.
///
/// The rest of each word is left untouched so numerals like `IV` survive.
pub fn title_case(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if c.is_whitespace() {
            at_word_start = true;
            result.push(c);
        } else if at_word_start {
            at_word_start = false;
            result.extend(c.to_uppercase());
        } else {
            result.push(c);
        }
    }
    result
}

/// Join text fragments (lines or spans) into running text.
///
/// A single space separates fragments unless the boundary already has
/// whitespace or both sides are CJK characters.
pub fn join_fragments<'a, I>(fragments: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut result = String::new();
    for fragment in fragments {
        if fragment.is_empty() {
            continue;
        }
        if let (Some(prev), Some(next)) = (result.chars().last(), fragment.chars().next()) {
            let spaced = prev.is_whitespace() || next.is_whitespace();
            let cjk = is_spaceless_script_char(prev) && is_spaceless_script_char(next);
            if !spaced && !cjk {
                result.push(' ');
            }
        }
        result.push_str(fragment);
    }
    result
}

/// Check if a character belongs to a script written without spaces.
pub(crate) fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;

    // CJK Unified Ideographs and extensions
    (0x4E00..=0x9FFF).contains(&code)
        || (0x3400..=0x4DBF).contains(&code)
        || (0x20000..=0x2EBEF).contains(&code)
        // Hiragana, Katakana
        || (0x3040..=0x30FF).contains(&code)
        // CJK symbols and punctuation, fullwidth forms
        || (0x3000..=0x303F).contains(&code)
        || (0xFF00..=0xFFEF).contains(&code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_language() {
        assert_eq!(detect_language("We propose a new model."), Language::English);
        assert_eq!(detect_language("本文提出了一种新的方法。"), Language::Chinese);
        assert_eq!(detect_language("基于深度学习的 Transformer 模型"), Language::Chinese);
        assert_eq!(detect_language(""), Language::English);
        assert_eq!(Language::Chinese.code(), "zh-CN");
    }

    #[test]
    fn test_split_sentences_latin() {
        let sentences = split_sentences(
            "We use 3.5 GPUs. Results improve by 2.1 points.  Done",
            Language::English,
        );
        assert_eq!(
            sentences,
            vec!["We use 3.5 GPUs.", "Results improve by 2.1 points.", "Done"]
        );
    }

    #[test]
    fn test_split_sentences_cjk() {
        let sentences = split_sentences("第一句。第二句。", Language::Chinese);
        assert_eq!(sentences, vec!["第一句。", "第二句。"]);
    }

    #[test]
    fn test_split_sentences_drops_empty_pieces() {
        assert!(split_sentences(" . ", Language::English).is_empty());
        assert!(split_sentences("", Language::Chinese).is_empty());
    }

    #[test]
    fn test_normalize_for_compare() {
        assert_eq!(normalize_for_compare("  1   Introduction\n"), "1 introduction");
        assert_eq!(normalize_for_compare("ＡＢＣ"), "abc");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("figure 3a"), "Figure 3a");
        assert_eq!(title_case("table IV"), "Table IV");
    }

    #[test]
    fn test_join_fragments() {
        assert_eq!(join_fragments(["deep", "learning "]), "deep learning ");
        assert_eq!(join_fragments(["深度", "学习"]), "深度学习");
        assert_eq!(join_fragments(["a ", "b", "", "c"]), "a b c");
    }
}
