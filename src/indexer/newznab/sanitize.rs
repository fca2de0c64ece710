//! Free-text query sanitizing

/// Turn a title into a safe `q=` value
///
/// Literal `+` characters are treated as word separators and become spaces
/// before the text is percent-encoded, so a cleaned title like
/// `Lord+of+the+Rings` and its raw form encode to the same query.
pub fn newznabify_title(title: &str) -> String {
    let title = title.replace('+', " ");
    urlencoding::encode(&title).into_owned()
}
