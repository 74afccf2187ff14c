use nn_core::{ArticleCandidate, ArticleDetail, Result, Source, SourceMetadata};

use crate::image::ImageNaming;

pub mod nepal;
use nepal::ekantipur::EkantipurAdapter;
use nepal::nagarik::NagarikAdapter;
use nepal::onlinekhabar::OnlinekhabarAdapter;

/// Site-specific markup knowledge. Adapters never touch the network; they
/// only read HTML the pipeline already fetched.
pub trait SourceAdapter: Send + Sync {
    fn source(&self) -> Source;

    fn source_metadata(&self) -> SourceMetadata {
        self.source().metadata()
    }

    fn homepage(&self) -> &'static str {
        self.source_metadata().homepage
    }

    /// Candidates from the homepage's latest-news section. Blocks without a
    /// title or link are dropped.
    fn extract_list(&self, html: &str) -> Vec<ArticleCandidate>;

    /// Fields from a detail page. Fails only when the main article
    /// container is missing.
    fn extract_detail(&self, html: &str) -> Result<ArticleDetail>;

    fn image_naming(&self) -> ImageNaming;

    fn image_identifier(&self, image_url: &str) -> Option<String> {
        self.image_naming().identifier(image_url)
    }
}

/// Enum that holds all supported adapters
#[derive(Debug, Clone)]
pub enum Adapter {
    Ekantipur(EkantipurAdapter),
    Onlinekhabar(OnlinekhabarAdapter),
    Nagarik(NagarikAdapter),
}

impl Adapter {
    pub fn for_source(source: Source) -> Self {
        match source {
            Source::Ekantipur => Adapter::Ekantipur(EkantipurAdapter::new()),
            Source::Onlinekhabar => Adapter::Onlinekhabar(OnlinekhabarAdapter::new()),
            Source::NagarikNews => Adapter::Nagarik(NagarikAdapter::new()),
        }
    }

    fn inner(&self) -> &dyn SourceAdapter {
        match self {
            Adapter::Ekantipur(a) => a,
            Adapter::Onlinekhabar(a) => a,
            Adapter::Nagarik(a) => a,
        }
    }
}

impl SourceAdapter for Adapter {
    fn source(&self) -> Source {
        self.inner().source()
    }

    fn extract_list(&self, html: &str) -> Vec<ArticleCandidate> {
        self.inner().extract_list(html)
    }

    fn extract_detail(&self, html: &str) -> Result<ArticleDetail> {
        self.inner().extract_detail(html)
    }

    fn image_naming(&self) -> ImageNaming {
        self.inner().image_naming()
    }
}

/// Common utilities for adapters
pub(crate) mod utils {
    use nn_core::ArticleCandidate;
    use scraper::{ElementRef, Selector};
    use std::collections::HashSet;
    use url::Url;

    /// Element text with surrounding whitespace removed.
    pub fn text_of(element: ElementRef<'_>) -> String {
        element.text().collect::<String>().trim().to_string()
    }

    pub fn first_text(scope: ElementRef<'_>, selector: &Selector) -> Option<String> {
        scope
            .select(selector)
            .map(text_of)
            .find(|text| !text.is_empty())
    }

    pub fn first_attr(scope: ElementRef<'_>, selector: &Selector, attrs: &[&str]) -> Option<String> {
        let element = scope.select(selector).next()?;
        attrs
            .iter()
            .filter_map(|attr| element.value().attr(attr))
            .map(str::trim)
            .find(|value| !value.is_empty())
            .map(str::to_string)
    }

    /// First heading in `scope` that wraps a link with an href, as
    /// (heading text, href). Headings without a link are passed over.
    pub fn linked_heading<'a>(
        scope: ElementRef<'a>,
        heading: &Selector,
        link: &Selector,
    ) -> Option<(String, &'a str)> {
        scope.select(heading).find_map(|heading| {
            let href = heading.select(link).next()?.value().attr("href")?;
            let title = text_of(heading);
            (!title.is_empty()).then_some((title, href))
        })
    }

    pub fn paragraphs(scope: ElementRef<'_>, selector: &Selector) -> Vec<String> {
        scope
            .select(selector)
            .map(text_of)
            .filter(|text| !text.is_empty())
            .collect()
    }

    /// Absolute URL for a possibly relative link.
    pub fn resolve(base: &str, href: &str) -> Option<String> {
        let href = href.trim();
        if href.is_empty() || href.starts_with('#') || href.starts_with("javascript:") {
            return None;
        }
        Url::parse(base).ok()?.join(href).ok().map(String::from)
    }

    /// Drop repeated detail links while preserving order.
    pub fn dedup_candidates(candidates: Vec<ArticleCandidate>) -> Vec<ArticleCandidate> {
        let mut seen = HashSet::new();
        candidates
            .into_iter()
            .filter(|c| seen.insert(c.detail_url.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::utils;
    use super::*;
    use scraper::{Html, Selector};

    #[test]
    fn test_adapter_for_source() {
        for source in Source::ALL {
            assert_eq!(Adapter::for_source(source).source(), source);
        }
        assert_eq!(
            Adapter::for_source(Source::NagarikNews).homepage(),
            "https://nagariknews.nagariknetwork.com/"
        );
    }

    #[test]
    fn test_resolve() {
        assert_eq!(
            utils::resolve("https://nagariknews.nagariknetwork.com/", "/politics/123/"),
            Some("https://nagariknews.nagariknetwork.com/politics/123/".to_string())
        );
        assert_eq!(
            utils::resolve("https://ekantipur.com/", "https://ekantipur.com/news/2024/10/19/x.html"),
            Some("https://ekantipur.com/news/2024/10/19/x.html".to_string())
        );
        assert_eq!(utils::resolve("https://ekantipur.com/", "  "), None);
        assert_eq!(utils::resolve("https://ekantipur.com/", "#top"), None);
    }

    #[test]
    fn test_text_helpers() {
        let html = r#"
            <div class="wrap">
                <p>  First  </p>
                <p></p>
                <p>Second</p>
                <img data-src="" src="/img/a.jpg">
            </div>
        "#;
        let document = Html::parse_document(html);
        let wrap = document
            .select(&Selector::parse("div.wrap").unwrap())
            .next()
            .unwrap();
        let p = Selector::parse("p").unwrap();
        let img = Selector::parse("img").unwrap();

        assert_eq!(utils::first_text(wrap, &p), Some("First".to_string()));
        assert_eq!(utils::paragraphs(wrap, &p), vec!["First", "Second"]);
        assert_eq!(
            utils::first_attr(wrap, &img, &["data-src", "src"]),
            Some("/img/a.jpg".to_string())
        );
    }

    #[test]
    fn test_linked_heading_skips_label_headings() {
        let html = r#"
            <div class="block">
                <h2>Label</h2>
                <h2><a>No href</a></h2>
                <h2><a href="/news/1">Headline</a></h2>
                <h2><a href="/news/2">Second</a></h2>
            </div>
        "#;
        let document = Html::parse_document(html);
        let block = document
            .select(&Selector::parse("div.block").unwrap())
            .next()
            .unwrap();
        let h2 = Selector::parse("h2").unwrap();
        let a = Selector::parse("a").unwrap();

        assert_eq!(
            utils::linked_heading(block, &h2, &a),
            Some(("Headline".to_string(), "/news/1"))
        );
    }

    #[test]
    fn test_dedup_candidates() {
        let candidate = |title: &str, url: &str| ArticleCandidate {
            title: title.to_string(),
            detail_url: url.to_string(),
            summary: None,
        };
        let deduped = utils::dedup_candidates(vec![
            candidate("A", "https://x/1"),
            candidate("B", "https://x/2"),
            candidate("A again", "https://x/1"),
        ]);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].title, "A");
        assert_eq!(deduped[1].title, "B");
    }
}
