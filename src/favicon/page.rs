use once_cell::sync::Lazy;
use scraper::{Html, Selector};

use super::IconSource;

static LINK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("link[rel]").expect("Failed to compile link selector"));

static OG_IMAGE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"meta[property="og:image"]"#).expect("Failed to compile og:image selector")
});

/// Icon references declared by a page.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PageIcons {
    /// One entry per `<link rel>` pattern found, in [`IconSource::LINK_RELS`] order
    pub links: Vec<(IconSource, String)>,
    /// `content` of the first `<meta property="og:image">`
    pub og_image: Option<String>,
}

/// `rel` is a token list: the pattern may match the whole value
/// (`"shortcut icon"`) or any single token of it (`"icon"`).
fn rel_matches(rel: &str, pattern: &str) -> bool {
    rel.trim().eq_ignore_ascii_case(pattern)
        || rel
            .split_ascii_whitespace()
            .any(|token| token.eq_ignore_ascii_case(pattern))
}

pub fn parse_page_icons(html: &str) -> PageIcons {
    let document = Html::parse_document(html);
    let mut icons = PageIcons::default();

    for source in IconSource::LINK_RELS {
        let pattern = source.label();
        let element = document.select(&LINK_SELECTOR).find(|el| {
            el.value()
                .attr("rel")
                .is_some_and(|rel| rel_matches(rel, pattern))
        });

        let Some(element) = element else {
            continue;
        };

        match element.value().attr("href").map(str::trim) {
            Some(href) if !href.is_empty() => icons.links.push((source, href.to_string())),
            _ => log::debug!("<link rel=\"{pattern}\"> has no href"),
        }
    }

    if let Some(element) = document.select(&OG_IMAGE_SELECTOR).next() {
        match element.value().attr("content").map(str::trim) {
            Some(content) if !content.is_empty() => icons.og_image = Some(content.to_string()),
            _ => log::debug!("og:image has no content"),
        }
    }

    icons
}
