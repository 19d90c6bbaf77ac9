// Case type detection and conversion

/// Classification of character casing within a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaseType {
    /// No cased letters in the word (only digits, punctuation, etc.).
    NoLetters,
    /// All letters are lowercase: "upto".
    AllLower,
    /// First letter is uppercase, rest are lowercase: "Upto".
    FirstUpper,
    /// Mixed case that does not fit other patterns: "SLang".
    Complex,
    /// All letters are uppercase: "UPTO".
    AllUpper,
}

fn is_cased(c: char) -> bool {
    c.is_uppercase() || c.is_lowercase()
}

/// Detect the case pattern of a word.
///
/// Characters without case (digits, punctuation) are ignored when
/// determining the pattern.
pub fn detect_case(word: &str) -> CaseType {
    let mut chars = word.chars();
    let Some(first) = chars.next() else {
        return CaseType::NoLetters;
    };

    let first_uc = first.is_uppercase();
    let mut no_letters = !is_cased(first);
    let mut all_uc = !first.is_lowercase();
    let mut rest_lc = true;

    for c in chars {
        if c.is_uppercase() {
            no_letters = false;
            rest_lc = false;
        }
        if c.is_lowercase() {
            all_uc = false;
            no_letters = false;
        }
    }

    if no_letters {
        return CaseType::NoLetters;
    }
    if all_uc {
        return CaseType::AllUpper;
    }
    if !rest_lc {
        return CaseType::Complex;
    }
    if first_uc {
        CaseType::FirstUpper
    } else {
        CaseType::AllLower
    }
}

/// True if the word has at least one cased letter and none of them is
/// uppercase.
pub fn is_all_lower(word: &str) -> bool {
    detect_case(word) == CaseType::AllLower
}

/// True if the word has at least one cased letter and none of them is
/// lowercase.
pub fn is_all_upper(word: &str) -> bool {
    detect_case(word) == CaseType::AllUpper
}

/// Uppercase every letter.
pub fn to_upper(word: &str) -> String {
    word.to_uppercase()
}

/// Title-case a word: a letter that follows a cased letter is lowercased,
/// any other letter is uppercased. "debian-edu" becomes "Debian-Edu".
pub fn to_title(word: &str) -> String {
    let mut out = String::with_capacity(word.len());
    let mut prev_cased = false;
    for c in word.chars() {
        if prev_cased {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        prev_cased = is_cased(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- detect_case tests --

    #[test]
    fn detect_empty() {
        assert_eq!(detect_case(""), CaseType::NoLetters);
    }

    #[test]
    fn detect_no_letters() {
        assert_eq!(detect_case("123"), CaseType::NoLetters);
        assert_eq!(detect_case("..."), CaseType::NoLetters);
    }

    #[test]
    fn detect_all_lower() {
        assert_eq!(detect_case("upto"), CaseType::AllLower);
        assert_eq!(detect_case("a"), CaseType::AllLower);
    }

    #[test]
    fn detect_first_upper() {
        assert_eq!(detect_case("Portugese"), CaseType::FirstUpper);
    }

    #[test]
    fn detect_all_upper() {
        assert_eq!(detect_case("UPTO"), CaseType::AllUpper);
        assert_eq!(detect_case("A"), CaseType::AllUpper);
    }

    #[test]
    fn detect_complex() {
        assert_eq!(detect_case("SLang"), CaseType::Complex);
        assert_eq!(detect_case("Debian-Edu"), CaseType::Complex);
    }

    #[test]
    fn detect_with_digits() {
        assert_eq!(detect_case("abc123"), CaseType::AllLower);
        assert_eq!(detect_case("ABC123"), CaseType::AllUpper);
        assert_eq!(detect_case("Abc123"), CaseType::FirstUpper);
        assert_eq!(detect_case("1abc"), CaseType::AllLower);
    }

    #[test]
    fn detect_non_ascii() {
        assert_eq!(detect_case("k\u{00E4}vel\u{00F6}"), CaseType::AllLower);
        assert_eq!(detect_case("\u{00C4}iti"), CaseType::FirstUpper);
        assert_eq!(detect_case("\u{00C4}\u{00D6}"), CaseType::AllUpper);
    }

    #[test]
    fn lower_and_upper_predicates() {
        assert!(is_all_lower("upto"));
        assert!(is_all_lower("up-to"));
        assert!(!is_all_lower("Upto"));
        assert!(!is_all_lower("42"));
        assert!(is_all_upper("SPAM"));
        assert!(!is_all_upper("spamSPAM"));
    }

    // -- conversion tests --

    #[test]
    fn title_case_words() {
        assert_eq!(to_title("abandonned"), "Abandonned");
        assert_eq!(to_title("debian-edu"), "Debian-Edu");
        assert_eq!(to_title("up to"), "Up To");
        assert_eq!(to_title("PORTUGUESE"), "Portuguese");
        assert_eq!(to_title("don't"), "Don'T");
    }

    #[test]
    fn upper_case_words() {
        assert_eq!(to_upper("upto"), "UPTO");
        assert_eq!(to_upper("\u{00E4}iti"), "\u{00C4}ITI");
    }
}
