use lazy_static::lazy_static;
use nn_core::{ArticleCandidate, ArticleDetail, Error, Result, Source};
use scraper::{Html, Selector};
use tracing::warn;

use crate::image::ImageNaming;
use crate::scrapers::utils::{dedup_candidates, first_attr, first_text, linked_heading, paragraphs, resolve};
use crate::scrapers::SourceAdapter;

const ARTICLE_CONTAINER: &str = "article";

lazy_static! {
    static ref LATEST: Selector = Selector::parse("div.justin").expect("valid selector");
    static ref LIST_ITEM: Selector = Selector::parse("article.list-group-item").expect("valid selector");
    static ref HEADING: Selector = Selector::parse("h1").expect("valid selector");
    static ref LINK: Selector = Selector::parse("a").expect("valid selector");
    static ref SUMMARY: Selector = Selector::parse("p").expect("valid selector");
    static ref ARTICLE: Selector = Selector::parse(ARTICLE_CONTAINER).expect("valid selector");
    static ref PARAGRAPH: Selector = Selector::parse("p").expect("valid selector");
    static ref AUTHOR: Selector = Selector::parse("author a").expect("valid selector");
    static ref TIME: Selector = Selector::parse("time").expect("valid selector");
    static ref LEAD_IMAGE: Selector = Selector::parse("div.main-news-section img").expect("valid selector");
}

#[derive(Debug, Clone, Default)]
pub struct NagarikAdapter;

impl NagarikAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl SourceAdapter for NagarikAdapter {
    fn source(&self) -> Source {
        Source::NagarikNews
    }

    fn extract_list(&self, html: &str) -> Vec<ArticleCandidate> {
        let document = Html::parse_document(html);
        let Some(latest) = document.select(&LATEST).next() else {
            warn!(source = %self.source(), "Latest news list not found on homepage");
            return Vec::new();
        };

        // homepage links are site-relative
        let candidates = latest
            .select(&LIST_ITEM)
            .filter_map(|item| {
                let (title, href) = linked_heading(item, &HEADING, &LINK)?;
                Some(ArticleCandidate {
                    title,
                    detail_url: resolve(self.homepage(), href)?,
                    summary: first_text(item, &SUMMARY),
                })
            })
            .collect();

        dedup_candidates(candidates)
    }

    fn extract_detail(&self, html: &str) -> Result<ArticleDetail> {
        let document = Html::parse_document(html);
        let root = document.root_element();
        let article = document
            .select(&ARTICLE)
            .next()
            .ok_or(Error::MissingContainer(ARTICLE_CONTAINER))?;

        let body_paragraphs = paragraphs(article, &PARAGRAPH);
        let image_url = first_attr(root, &LEAD_IMAGE, &["src", "data-src"])
            .and_then(|src| resolve(self.homepage(), &src));

        Ok(ArticleDetail {
            author: first_text(root, &AUTHOR),
            published_label: first_text(root, &TIME),
            lead: body_paragraphs.first().cloned(),
            body_paragraphs,
            image_url,
        })
    }

    fn image_naming(&self) -> ImageNaming {
        ImageNaming::verbatim(3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOMEPAGE: &str = r#"
        <html><body>
          <div class="justin">
            <article class="list-group-item">
              <h1><a href="/politics/2024/10/19/1.html">प्रधानमन्त्रीको भ्रमण</a></h1>
              <p>प्रधानमन्त्री आज भारत जाँदै ।</p>
            </article>
            <article class="list-group-item">
              <h1><a>लिंक बिनाको शीर्षक</a></h1>
              <p>Summary without a link</p>
            </article>
            <article class="list-group-item">
              <h1><a href="economy/2024/10/19/2.html">सेयर बजार</a></h1>
            </article>
            <article class="list-group-item">
              <h1>अर्थ</h1>
              <h1><a href="/economy/2024/10/19/3.html">ब्याजदर घट्यो</a></h1>
            </article>
            <article class="list-group-item">
              <h1>अर्थ</h1>
              <h1><a href="/economy/2024/10/19/4.html">रेमिट्यान्स बढ्यो</a></h1>
            </article>
          </div>
        </body></html>
    "#;

    const DETAIL: &str = r#"
        <html><body>
          <div class="main-news-section">
            <img src="https://assets.nagariknewscdn.com/images/thumb/1200/pm-visit.jpg">
          </div>
          <author><a href="/author/1">नागरिक संवाददाता</a></author>
          <time>शनिबार, कात्तिक ३, २०८१</time>
          <article>
            <p>काठमाडौं, प्रधानमन्त्री आज भारत जाँदै छन् ।</p>
            <p>उनी तीन दिन बस्नेछन् ।</p>
          </article>
        </body></html>
    "#;

    #[test]
    fn test_extract_list() {
        let candidates = NagarikAdapter::new().extract_list(HOMEPAGE);
        assert_eq!(candidates.len(), 4);
        assert_eq!(candidates[0].title, "प्रधानमन्त्रीको भ्रमण");
        assert_eq!(
            candidates[0].detail_url,
            "https://nagariknews.nagariknetwork.com/politics/2024/10/19/1.html"
        );
        assert_eq!(candidates[0].summary.as_deref(), Some("प्रधानमन्त्री आज भारत जाँदै ।"));
        assert_eq!(
            candidates[1].detail_url,
            "https://nagariknews.nagariknetwork.com/economy/2024/10/19/2.html"
        );
    }

    #[test]
    fn test_label_heading_does_not_become_title() {
        let candidates = NagarikAdapter::new().extract_list(HOMEPAGE);
        assert_eq!(candidates[2].title, "ब्याजदर घट्यो");
        assert_eq!(
            candidates[2].detail_url,
            "https://nagariknews.nagariknetwork.com/economy/2024/10/19/3.html"
        );
        assert_eq!(candidates[3].title, "रेमिट्यान्स बढ्यो");
        assert!(candidates.iter().all(|c| c.title != "अर्थ"));
    }

    #[test]
    fn test_extract_detail() {
        let adapter = NagarikAdapter::new();
        let detail = adapter.extract_detail(DETAIL).unwrap();
        assert_eq!(detail.author.as_deref(), Some("नागरिक संवाददाता"));
        assert_eq!(detail.published_label.as_deref(), Some("शनिबार, कात्तिक ३, २०८१"));
        assert_eq!(detail.body_paragraphs.len(), 2);

        let image_url = detail.image_url.unwrap();
        assert_eq!(adapter.image_identifier(&image_url).as_deref(), Some("pm-visit.jpg"));
    }

    #[test]
    fn test_extract_detail_missing_container() {
        let err = NagarikAdapter::new()
            .extract_detail("<html><body><div>No article here</div></body></html>")
            .unwrap_err();
        assert!(matches!(err, Error::MissingContainer("article")));
    }
}
