//! SerpAPI web search adapter
//!
//! Configuration and result gaps come back as explanatory text rather
//! than errors, so the search digest can be appended to a prompt as-is.

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::{DomainError, WebSearch};
use crate::infrastructure::http_client::HttpClientTrait;

const DEFAULT_SERPAPI_BASE_URL: &str = "https://serpapi.com";
const DEFAULT_RESULT_COUNT: usize = 5;

#[derive(Debug)]
pub struct SerpApiSearch<C: HttpClientTrait> {
    client: C,
    api_key: Option<String>,
    base_url: String,
}

impl<C: HttpClientTrait> SerpApiSearch<C> {
    pub fn new(client: C, api_key: Option<String>) -> Self {
        Self::with_base_url(client, api_key, DEFAULT_SERPAPI_BASE_URL)
    }

    pub fn with_base_url(
        client: C,
        api_key: Option<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_key: api_key.filter(|key| !key.is_empty()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn search_url(&self, query: &str, api_key: &str) -> String {
        let mut url = format!("{}/search?engine=google", self.base_url);
        url.push_str(&format!("&q={}", urlencode(query)));
        url.push_str(&format!("&num={DEFAULT_RESULT_COUNT}"));
        url.push_str(&format!("&api_key={api_key}"));
        url
    }

    fn format_results(response: SerpApiResponse, query: &str) -> String {
        let mut sections = Vec::new();

        if let Some(answer) = response
            .answer_box
            .and_then(|b| b.answer.or(b.snippet))
            .filter(|s| !s.is_empty())
        {
            sections.push(format!("**Featured Answer:**\n{answer}"));
        }

        let organic: Vec<String> = response
            .organic_results
            .iter()
            .take(DEFAULT_RESULT_COUNT)
            .enumerate()
            .map(|(index, result)| {
                format!(
                    "{}. **{}**\n   {}\n   Source: {}",
                    index + 1,
                    result.title.as_deref().unwrap_or("Untitled"),
                    result.snippet.as_deref().unwrap_or(""),
                    result.link.as_deref().unwrap_or("")
                )
            })
            .collect();

        if !organic.is_empty() {
            sections.push(organic.join("\n\n"));
        }

        if sections.is_empty() {
            format!("No results found for: {query}")
        } else {
            sections.join("\n\n")
        }
    }
}

#[async_trait]
impl<C: HttpClientTrait> WebSearch for SerpApiSearch<C> {
    async fn search(&self, query: &str) -> Result<String, DomainError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Ok("Web search is not configured. Please set SERPAPI_API_KEY.".to_string());
        };

        if query.is_empty() {
            return Ok("No search query provided.".to_string());
        }

        let url = self.search_url(query, api_key);
        let json = match self.client.get_json(&url, Vec::new()).await {
            Ok(json) => json,
            Err(error) => return Ok(format!("Web search failed: {error}")),
        };

        let response: SerpApiResponse = serde_json::from_value(json)
            .map_err(|e| DomainError::provider("serpapi", format!("Failed to parse response: {e}")))?;

        Ok(Self::format_results(response, query))
    }
}

fn urlencode(value: &str) -> String {
    value
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                (b as char).to_string()
            }
            b' ' => "+".to_string(),
            other => format!("%{other:02X}"),
        })
        .collect()
}

#[derive(Debug, Deserialize)]
struct SerpApiResponse {
    #[serde(default)]
    organic_results: Vec<OrganicResult>,
    #[serde(default)]
    answer_box: Option<AnswerBox>,
}

#[derive(Debug, Deserialize)]
struct OrganicResult {
    title: Option<String>,
    snippet: Option<String>,
    link: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AnswerBox {
    answer: Option<String>,
    snippet: Option<String>,
}
