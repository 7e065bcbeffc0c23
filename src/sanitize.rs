//! Allow-list HTML sanitizer applied to every post body and comment.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use ammonia::Builder;

const ALLOWED_TAGS: &[&str] = &[
    "a", "abbr", "acronym", "address", "b", "div", "dl", "dt", "em", "h1", "h2", "h3", "h4", "h5",
    "h6", "hr", "i", "img", "li", "ol", "p", "pre", "q", "s", "small", "strike", "span", "sub",
    "sup", "table", "tbody", "td", "tfoot", "th", "thead", "tr", "tt", "u", "ul", "strong", "wbr",
];

const LINK_ATTRIBUTES: &[&str] = &["href", "target", "title"];

const IMAGE_ATTRIBUTES: &[&str] = &["src", "alt", "width", "height", "style"];

const GENERIC_ATTRIBUTES: &[&str] = &["style"];

const ALLOWED_CSS_PROPERTIES: &[&str] = &["color", "height", "width"];

static SANITIZER: LazyLock<Builder<'static>> = LazyLock::new(|| {
    let mut builder = Builder::default();
    builder
        .tags(ALLOWED_TAGS.iter().copied().collect())
        .tag_attributes(HashMap::from([
            ("a", LINK_ATTRIBUTES.iter().copied().collect::<HashSet<_>>()),
            ("img", IMAGE_ATTRIBUTES.iter().copied().collect::<HashSet<_>>()),
        ]))
        .generic_attributes(GENERIC_ATTRIBUTES.iter().copied().collect())
        .filter_style_properties(ALLOWED_CSS_PROPERTIES.iter().copied().collect())
        // Only allow-listed attributes may appear in the output.
        .link_rel(None);
    builder
});

/// Strip everything outside the allow-list from untrusted HTML.
///
/// Disallowed tags are removed but their text is kept, except for
/// `script`/`style` whose contents are dropped entirely. Inline CSS is
/// reduced to `color`, `height` and `width`.
pub fn sanitize_html(content: &str) -> String {
    SANITIZER.clean(content).to_string()
}
