//! Text clean-up helpers for corpus entries

use scraper::Html;

/// Decodes HTML character references in a rendered title
///
/// ```
/// use corpress::corpus::text::unescape_title;
///
/// assert_eq!(unescape_title("Fish &amp; Chips &#8211; a review"), "Fish & Chips – a review");
/// ```
pub fn unescape_title(title: &str) -> String {
    html_escape::decode_html_entities(title).into_owned()
}

/// Returns the visible text of an HTML fragment, trimmed
///
/// Text without markup comes back unchanged apart from the trim, except that
/// line endings are normalised to `\n` as HTML parsing requires (`\r\n` and
/// a lone `\r` both become `\n`).
pub fn strip_markup(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let text: String = fragment.root_element().text().collect();
    text.trim().to_string()
}

/// Slugifies a title for use in a file name, capped at `max_length` characters
///
/// Truncation never leaves a trailing separator.
pub fn slugify_title(title: &str, max_length: usize) -> String {
    let slug = slug::slugify(title);
    let truncated: String = slug.chars().take(max_length).collect();
    truncated.trim_end_matches('-').to_string()
}
