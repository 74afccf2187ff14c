use lazy_static::lazy_static;
use nn_core::{ArticleCandidate, ArticleDetail, Error, Result, Source};
use scraper::{Html, Selector};
use tracing::warn;

use crate::image::ImageNaming;
use crate::scrapers::utils::{dedup_candidates, first_attr, first_text, paragraphs, resolve, text_of};
use crate::scrapers::SourceAdapter;

const MAIN_CONTAINER: &str = "div.col-xs-10.col-sm-10.col-md-10";

lazy_static! {
    static ref LATEST_SECTION: Selector = Selector::parse("section.main-news.layout3").expect("valid selector");
    static ref ARTICLE: Selector = Selector::parse("article").expect("valid selector");
    static ref TITLE_LINK: Selector = Selector::parse("h1 a").expect("valid selector");
    static ref SUMMARY: Selector = Selector::parse("p").expect("valid selector");
    static ref MAIN: Selector = Selector::parse(MAIN_CONTAINER).expect("valid selector");
    static ref AUTHOR: Selector = Selector::parse("span.author").expect("valid selector");
    static ref PARAGRAPH: Selector = Selector::parse("p").expect("valid selector");
    static ref TIME: Selector = Selector::parse("time").expect("valid selector");
    static ref FIGURE_IMAGE: Selector = Selector::parse("figure img").expect("valid selector");
}

#[derive(Debug, Clone, Default)]
pub struct EkantipurAdapter;

impl EkantipurAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl SourceAdapter for EkantipurAdapter {
    fn source(&self) -> Source {
        Source::Ekantipur
    }

    fn extract_list(&self, html: &str) -> Vec<ArticleCandidate> {
        let document = Html::parse_document(html);
        let Some(section) = document.select(&LATEST_SECTION).next() else {
            warn!(source = %self.source(), "Latest news section not found on homepage");
            return Vec::new();
        };

        let candidates = section
            .select(&ARTICLE)
            .filter_map(|block| {
                let link = block.select(&TITLE_LINK).next()?;
                let title = text_of(link);
                if title.is_empty() {
                    return None;
                }
                let detail_url = resolve(self.homepage(), link.value().attr("href")?)?;
                Some(ArticleCandidate {
                    title,
                    detail_url,
                    summary: first_text(block, &SUMMARY),
                })
            })
            .collect();

        dedup_candidates(candidates)
    }

    fn extract_detail(&self, html: &str) -> Result<ArticleDetail> {
        let document = Html::parse_document(html);
        let main = document
            .select(&MAIN)
            .next()
            .ok_or(Error::MissingContainer(MAIN_CONTAINER))?;

        let body_paragraphs = paragraphs(main, &PARAGRAPH);
        // lazy-loaded images keep the real URL in data-src
        let image_url = first_attr(main, &FIGURE_IMAGE, &["data-src", "src"])
            .and_then(|src| resolve(self.homepage(), &src));

        Ok(ArticleDetail {
            author: first_text(main, &AUTHOR),
            published_label: first_text(main, &TIME),
            lead: body_paragraphs.first().cloned(),
            body_paragraphs,
            image_url,
        })
    }

    fn image_naming(&self) -> ImageNaming {
        ImageNaming::with_extension(4, "jpg")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOMEPAGE: &str = r#"
        <html><body>
          <section class="main-news layout3">
            <article>
              <h1><a href="https://ekantipur.com/news/2024/10/19/budget-1.html"> बजेट पारित </a></h1>
              <p>संसदले बजेट पारित गर्‍यो ।</p>
            </article>
            <article>
              <h1><a href="/news/2024/10/19/flood-2.html">बाढी</a></h1>
            </article>
            <article>
              <h1>Heading without link</h1>
            </article>
            <article>
              <div class="teaser">No heading at all</div>
            </article>
          </section>
          <section class="other-news">
            <article><h1><a href="/elsewhere.html">Not latest</a></h1></article>
          </section>
        </body></html>
    "#;

    const DETAIL: &str = r#"
        <html><body>
          <div class="col-xs-10 col-sm-10 col-md-10">
            <span class="author">राम शर्मा</span>
            <time>कात्तिक ३, २०८१</time>
            <figure><img src="/placeholder.gif" data-src="https://assets-cdn.ekantipur.com/images/third-party/2024/10/budget-1729.jpg"></figure>
            <p>पहिलो अनुच्छेद</p>
            <p> </p>
            <p>दोस्रो अनुच्छेद</p>
          </div>
        </body></html>
    "#;

    #[test]
    fn test_extract_list() {
        let candidates = EkantipurAdapter::new().extract_list(HOMEPAGE);
        assert_eq!(candidates.len(), 2);

        assert_eq!(candidates[0].title, "बजेट पारित");
        assert_eq!(
            candidates[0].detail_url,
            "https://ekantipur.com/news/2024/10/19/budget-1.html"
        );
        assert_eq!(candidates[0].summary.as_deref(), Some("संसदले बजेट पारित गर्‍यो ।"));

        assert_eq!(candidates[1].detail_url, "https://ekantipur.com/news/2024/10/19/flood-2.html");
        assert_eq!(candidates[1].summary, None);
    }

    #[test]
    fn test_extract_list_without_section() {
        let candidates = EkantipurAdapter::new().extract_list("<html><body></body></html>");
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_extract_detail() {
        let adapter = EkantipurAdapter::new();
        let detail = adapter.extract_detail(DETAIL).unwrap();
        assert_eq!(detail.author.as_deref(), Some("राम शर्मा"));
        assert_eq!(detail.published_label.as_deref(), Some("कात्तिक ३, २०८१"));
        assert_eq!(detail.body_paragraphs, vec!["पहिलो अनुच्छेद", "दोस्रो अनुच्छेद"]);
        assert_eq!(detail.lead.as_deref(), Some("पहिलो अनुच्छेद"));

        let image_url = detail.image_url.unwrap();
        assert_eq!(
            image_url,
            "https://assets-cdn.ekantipur.com/images/third-party/2024/10/budget-1729.jpg"
        );
        assert_eq!(adapter.image_identifier(&image_url).as_deref(), Some("budget-1729.jpg"));
    }

    #[test]
    fn test_extract_detail_optional_fields() {
        let html = r#"<div class="col-xs-10 col-sm-10 col-md-10"><p>Only body</p></div>"#;
        let detail = EkantipurAdapter::new().extract_detail(html).unwrap();
        assert_eq!(detail.author, None);
        assert_eq!(detail.published_label, None);
        assert_eq!(detail.image_url, None);
        assert_eq!(detail.body_paragraphs, vec!["Only body"]);
    }

    #[test]
    fn test_extract_detail_missing_container() {
        let err = EkantipurAdapter::new()
            .extract_detail("<html><body><p>Moved</p></body></html>")
            .unwrap_err();
        assert!(matches!(err, Error::MissingContainer(_)));
    }
}
