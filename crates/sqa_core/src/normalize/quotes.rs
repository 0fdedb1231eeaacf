use std::borrow::Borrow;

use any_ascii::any_ascii;

/// Separator placed between snippet quotes inside a paper's combined quote.
pub const QUOTE_SEPARATOR: &str = "...";

/// Transliterate to the closest ASCII representation.
///
/// This is the single folding step shared by quote normalization and citation key
/// canonicalization, so keys built from model output line up with keys built from
/// source metadata.
pub fn ascii_fold(text: &str) -> String {
    any_ascii(text)
}

/// Normalize a snippet so it survives a join/split on [`QUOTE_SEPARATOR`].
///
/// Contract:
/// - Surrounding whitespace is removed and the text is folded to ASCII
///   (curly quotes become straight quotes, an em-dash becomes `-`).
/// - Every trailing `.` is removed, together with any whitespace that removal exposes.
///   Internal periods (`Fig. 1`, `et al. report`) are kept.
/// - Idempotent: normalizing a normalized quote returns it unchanged.
pub fn normalize_snippet_quote(text: &str) -> String {
    let folded = ascii_fold(text.trim());
    folded
        .trim_end_matches(|c: char| c == '.' || c.is_ascii_whitespace())
        .trim_start()
        .to_string()
}

/// Join normalized quotes into a combined quote.
pub fn join_quotes<S: Borrow<str>>(quotes: &[S]) -> String {
    quotes.join(QUOTE_SEPARATOR)
}

/// Split a combined quote back into its snippet quotes, trimming each piece.
pub fn split_combined_quote(combined: &str) -> Vec<String> {
    combined
        .split(QUOTE_SEPARATOR)
        .map(|piece| piece.trim().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_space_before_period_is_trimmed() {
        assert_eq!(normalize_snippet_quote("text ."), "text");
        assert_eq!(normalize_snippet_quote("text . ."), "text");
    }

    #[test]
    fn empty_and_period_only_inputs_normalize_to_empty() {
        assert_eq!(normalize_snippet_quote(""), "");
        assert_eq!(normalize_snippet_quote("   "), "");
        assert_eq!(normalize_snippet_quote("..."), "");
    }
}
