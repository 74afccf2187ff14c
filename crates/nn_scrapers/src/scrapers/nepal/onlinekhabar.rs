use lazy_static::lazy_static;
use nn_core::{ArticleCandidate, ArticleDetail, Error, Result, Source};
use scraper::{Html, Selector};
use tracing::warn;

use crate::image::ImageNaming;
use crate::scrapers::utils::{dedup_candidates, first_attr, first_text, linked_heading, paragraphs, resolve};
use crate::scrapers::SourceAdapter;

const CONTENT_WRAP: &str = "div.ok18-single-post-content-wrap";

lazy_static! {
    static ref SPECIAL_SECTION: Selector = Selector::parse("section.ok-bises").expect("valid selector");
    static ref CONTAINER: Selector = Selector::parse("div.ok-container").expect("valid selector");
    static ref HEADING: Selector = Selector::parse("h2").expect("valid selector");
    static ref LINK: Selector = Selector::parse("a").expect("valid selector");
    static ref CONTENT: Selector = Selector::parse(CONTENT_WRAP).expect("valid selector");
    static ref PARAGRAPH: Selector = Selector::parse("p").expect("valid selector");
    static ref AUTHOR: Selector = Selector::parse("span.author-name").expect("valid selector");
    static ref POST_HOUR: Selector = Selector::parse("div.ok-news-post-hour span").expect("valid selector");
    static ref THUMBNAIL: Selector = Selector::parse("div.post-thumbnail img").expect("valid selector");
}

#[derive(Debug, Clone, Default)]
pub struct OnlinekhabarAdapter;

impl OnlinekhabarAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl SourceAdapter for OnlinekhabarAdapter {
    fn source(&self) -> Source {
        Source::Onlinekhabar
    }

    /// Onlinekhabar's homepage carries no teaser text; the summary comes
    /// from the detail page's lead paragraph instead.
    fn extract_list(&self, html: &str) -> Vec<ArticleCandidate> {
        let document = Html::parse_document(html);
        let mut candidates = Vec::new();

        for section in document.select(&SPECIAL_SECTION) {
            let Some(container) = section.select(&CONTAINER).next() else {
                continue;
            };
            let Some((title, href)) = linked_heading(container, &HEADING, &LINK) else {
                continue;
            };
            if let Some(detail_url) = resolve(self.homepage(), href) {
                candidates.push(ArticleCandidate {
                    title,
                    detail_url,
                    summary: None,
                });
            }
        }

        if candidates.is_empty() {
            warn!(source = %self.source(), "No headline sections found on homepage");
        }
        dedup_candidates(candidates)
    }

    fn extract_detail(&self, html: &str) -> Result<ArticleDetail> {
        let document = Html::parse_document(html);
        let root = document.root_element();
        let content = document
            .select(&CONTENT)
            .next()
            .ok_or(Error::MissingContainer(CONTENT_WRAP))?;

        let body_paragraphs = paragraphs(content, &PARAGRAPH);
        let image_url = first_attr(root, &THUMBNAIL, &["src", "data-src"])
            .and_then(|src| resolve(self.homepage(), &src));

        Ok(ArticleDetail {
            author: first_text(root, &AUTHOR),
            published_label: first_text(root, &POST_HOUR),
            lead: body_paragraphs.first().cloned(),
            body_paragraphs,
            image_url,
        })
    }

    fn image_naming(&self) -> ImageNaming {
        ImageNaming::verbatim(4)
    }
}
