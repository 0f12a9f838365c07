/// Splits a label document into terms.
///
/// A term is a maximal run of alphanumeric characters or `_`; runs shorter
/// than `min_chars` are dropped. Mirrors the usual `\b\w\w+\b` TF-IDF token
/// pattern when `min_chars` is 2.
pub fn tokenize(document: &str, lowercase: bool, min_chars: usize) -> Vec<String> {
    let normalised;
    let text = if lowercase {
        normalised = document.to_lowercase();
        normalised.as_str()
    } else {
        document
    };

    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|token| token.chars().count() >= min_chars)
        .map(String::from)
        .collect()
}
