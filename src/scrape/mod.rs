// src/scrape/mod.rs
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("failed to fetch job page: {0}")]
    Request(#[from] reqwest::Error),

    #[error("job page returned HTTP {0}")]
    Status(reqwest::StatusCode),
}

/// Title and visible content text pulled from one job-posting page.
#[derive(Debug, Clone)]
pub struct ScrapedJobPage {
    pub title: String,
    pub body_text: String,
}

pub struct JobScraper {
    client: Client,
}

impl Default for JobScraper {
    fn default() -> Self {
        Self::new()
    }
}

impl JobScraper {
    pub fn new() -> Self {
        let client = Client::builder()
            .user_agent("Mozilla/5.0")
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }

    pub async fn fetch(&self, url: &str) -> Result<ScrapedJobPage, ScrapeError> {
        info!("Fetching job post: {}", url);

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(ScrapeError::Status(response.status()));
        }

        let html = response.text().await?;
        let page = Self::parse(&html);

        info!("Scraped job page with title: {}", page.title);
        Ok(page)
    }

    /// Extract the job title and main content text from raw HTML.
    ///
    /// Title precedence: first `<h1>`, else `<title>`, else "Unknown Role".
    /// Content precedence: first `<main>`, else `<section>`, else the
    /// whole document. Disjoint text nodes are joined with single spaces.
    pub fn parse(html: &str) -> ScrapedJobPage {
        let document = Html::parse_document(html);

        let title = Self::first_element_text(&document, &["h1", "title"])
            .unwrap_or_else(|| "Unknown Role".to_string());

        let body_text = Self::first_element(&document, &["main", "section"])
            .map(|element| Self::element_text(element))
            .unwrap_or_else(|| Self::element_text(document.root_element()));

        ScrapedJobPage { title, body_text }
    }

    fn first_element<'a>(document: &'a Html, selectors: &[&str]) -> Option<ElementRef<'a>> {
        for selector_str in selectors {
            if let Ok(selector) = Selector::parse(selector_str) {
                if let Some(element) = document.select(&selector).next() {
                    return Some(element);
                }
            }
        }
        None
    }

    fn first_element_text(document: &Html, selectors: &[&str]) -> Option<String> {
        for selector_str in selectors {
            if let Ok(selector) = Selector::parse(selector_str) {
                if let Some(element) = document.select(&selector).next() {
                    let text = Self::element_text(element);
                    if !text.is_empty() {
                        return Some(text);
                    }
                }
            }
        }
        None
    }

    fn element_text(element: ElementRef<'_>) -> String {
        element
            .text()
            .flat_map(|node| node.split_whitespace())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_prefers_h1_over_title_tag() {
        let html = "<html><head><title>Careers</title></head>\
                    <body><h1>Data Analyst II</h1></body></html>";
        let page = JobScraper::parse(html);
        assert_eq!(page.title, "Data Analyst II");
    }

    #[test]
    fn test_parse_falls_back_to_title_tag() {
        let html = "<html><head><title>QA Engineer - Acme</title></head>\
                    <body><p>Apply now</p></body></html>";
        let page = JobScraper::parse(html);
        assert_eq!(page.title, "QA Engineer - Acme");
    }

    #[test]
    fn test_parse_unknown_role_when_no_title() {
        let page = JobScraper::parse("<html><body><p>nothing here</p></body></html>");
        assert_eq!(page.title, "Unknown Role");
    }

    #[test]
    fn test_parse_prefers_main_over_section() {
        let html = "<html><body><h1>Role</h1>\
                    <section>sidebar text</section>\
                    <main><p>Build</p><p>dashboards</p></main>\
                    </body></html>";
        let page = JobScraper::parse(html);
        assert_eq!(page.body_text, "Build dashboards");
    }

    #[test]
    fn test_parse_falls_back_to_section_then_document() {
        let html = "<html><body><section>Only   section\ntext</section></body></html>";
        let page = JobScraper::parse(html);
        assert_eq!(page.body_text, "Only section text");

        let bare = JobScraper::parse("<html><body><h1>A</h1><p>B</p></body></html>");
        assert_eq!(bare.body_text, "A B");
    }

    #[test]
    fn test_text_nodes_joined_with_single_spaces() {
        let html = "<html><body><main><span>Python,</span><span>AWS</span>\
                    <div>microservices</div></main></body></html>";
        let page = JobScraper::parse(html);
        assert_eq!(page.body_text, "Python, AWS microservices");
    }
}
