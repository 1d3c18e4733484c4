//! Text sanitizer
//!
//! Cleans text pasted out of generated cover letters and emails before it is
//! sent anywhere: every em-dash (U+2014) becomes a single space.

const EM_DASH: char = '\u{2014}';

/// Replaces every em-dash with a single space
///
/// Nothing else is touched: en-dashes, hyphens and surrounding whitespace
/// are kept as they are.
///
/// ```
/// use jobscript_harvester::sanitize_text;
///
/// assert_eq!(sanitize_text("fast\u{2014}reliable"), "fast reliable");
/// ```
pub fn sanitize_text(input: &str) -> String {
    input.replace(EM_DASH, " ")
}

/// Returns true if the text contains anything worth sanitizing
pub fn has_content(input: &str) -> bool {
    !input.trim().is_empty()
}
