//! OCR-tolerant regex fragments.
//!
//! Text pulled from scanned or poorly encoded notices often carries stray
//! spaces between letters ("P U B L I C  N O T I C E"). The builders here turn
//! a literal phrase into a pattern that accepts an optional space after every
//! character and up to two spaces between words.

use regex::Regex;

/// Letter-case handling for [`spaced_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Case {
    /// Letters must match exactly.
    Exact,
    /// Every letter matches either case.
    Insensitive,
    /// First letter of each word exact, the rest either case.
    LeadingExact,
}

/// Exact-case spaced pattern.
pub fn spaced(phrase: &str) -> String {
    spaced_with(phrase, Case::Exact)
}

/// Case-insensitive spaced pattern.
pub fn spaced_ci(phrase: &str) -> String {
    spaced_with(phrase, Case::Insensitive)
}

/// Spaced pattern with an exact leading letter per word, e.g. `APPLICANT`
/// matching "Applicant" and "A P P L I C A N T" but not "applicant".
pub fn spaced_lead(phrase: &str) -> String {
    spaced_with(phrase, Case::LeadingExact)
}

pub fn spaced_with(phrase: &str, case: Case) -> String {
    phrase
        .split_whitespace()
        .map(|word| spaced_word(word, case))
        .collect::<Vec<_>>()
        .join(r"\s{0,2}")
}

fn spaced_word(word: &str, case: Case) -> String {
    word.chars()
        .enumerate()
        .map(|(i, c)| {
            let insensitive = match case {
                Case::Exact => false,
                Case::Insensitive => true,
                Case::LeadingExact => i > 0,
            };
            if insensitive && c.is_alphabetic() && c.to_lowercase().ne(c.to_uppercase()) {
                format!("[{}{}]", c.to_uppercase(), c.to_lowercase())
            } else {
                regex::escape(&c.to_string())
            }
        })
        .collect::<Vec<_>>()
        .join(r"\s?")
}

/// Compile a pattern built at startup. Patterns are program constants, so a
/// failure here is a bug rather than a runtime condition.
pub fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("pattern {:?} should compile: {}", pattern, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spaced_tolerates_inserted_spaces() {
        let re = compile(&spaced("PUBLIC NOTICE"));
        assert!(re.is_match("PUBLIC NOTICE"));
        assert!(re.is_match("P U B L I C  N O T I C E"));
        assert!(re.is_match("PUBLICNOTICE"));
        assert!(!re.is_match("Public Notice"));
    }

    #[test]
    fn test_spaced_ci() {
        let re = compile(&spaced_ci("project manager"));
        assert!(re.is_match("Project Manager"));
        assert!(re.is_match("PROJECT MANAGER"));
        assert!(re.is_match("pro ject man ager"));
    }

    #[test]
    fn test_spaced_lead() {
        let re = compile(&spaced_lead("APPLICANT"));
        assert!(re.is_match("Applicant:"));
        assert!(re.is_match("A P P L I C A N T"));
        assert!(!re.is_match("applicant"));
    }

    #[test]
    fn test_special_characters_escaped() {
        let re = compile(&format!("^{}$", spaced("U.S.")));
        assert!(re.is_match("U. S."));
        assert!(!re.is_match("UxSx"));
    }
}
