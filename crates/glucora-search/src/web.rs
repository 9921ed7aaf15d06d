// SPDX-FileCopyrightText: 2026 Glucora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Web search backend (Exa-style JSON search API).
//!
//! The `medical_web` class is the same backend restricted to established
//! medical domains; the `web` class searches unrestricted.

use glucora_core::{GlucoraError, SourceClass, SourceSnippet};
use serde::{Deserialize, Serialize};

use crate::clip;

/// Domains eligible for `medical_web` results.
const MEDICAL_DOMAINS: &[&str] = &[
    "diabetes.org",
    "diabetesjournals.org",
    "mayoclinic.org",
    "nih.gov",
    "cdc.gov",
    "who.int",
];

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    #[serde(rename = "numResults")]
    num_results: usize,
    #[serde(rename = "includeDomains", skip_serializing_if = "Option::is_none")]
    include_domains: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    #[serde(default)]
    title: String,
    url: String,
    #[serde(default)]
    text: Option<String>,
}

pub(crate) async fn search(
    client: &reqwest::Client,
    base_url: &str,
    api_key: &str,
    query: &str,
    class: SourceClass,
    limit: usize,
) -> Result<Vec<SourceSnippet>, GlucoraError> {
    let include_domains = (class == SourceClass::MedicalWeb)
        .then(|| MEDICAL_DOMAINS.iter().map(|d| d.to_string()).collect());

    let body = SearchRequest {
        query,
        num_results: limit,
        include_domains,
    };

    let response: SearchResponse = client
        .post(base_url)
        .header("x-api-key", api_key)
        .json(&body)
        .send()
        .await
        .map_err(|e| GlucoraError::Retrieval {
            message: format!("web search request failed: {e}"),
            source: Some(Box::new(e)),
        })?
        .error_for_status()
        .map_err(|e| GlucoraError::Retrieval {
            message: format!("web search request failed: {e}"),
            source: Some(Box::new(e)),
        })?
        .json()
        .await
        .map_err(|e| GlucoraError::Retrieval {
            message: format!("failed to parse web search response: {e}"),
            source: Some(Box::new(e)),
        })?;

    Ok(response
        .results
        .into_iter()
        .take(limit)
        .map(|result| SourceSnippet {
            snippet: clip(result.text.as_deref().unwrap_or(&result.title), 300),
            title: clip(&result.title, 200),
            url: result.url,
            class,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use glucora_core::RetrieveAdapter;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::MedicalRetriever;
    use crate::tests::test_options;

    use super::*;

    fn results_body() -> serde_json::Value {
        serde_json::json!({
            "results": [{
                "title": "CGM coverage changes in 2026",
                "url": "https://diabetes.org/news/cgm-coverage",
                "text": "Coverage criteria were broadened for type 2 patients."
            }]
        })
    }

    #[tokio::test]
    async fn web_class_searches_unrestricted() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/search"))
            .and(header("x-api-key", "test-key"))
            .and(body_partial_json(serde_json::json!({
                "query": "cgm coverage",
                "numResults": 3
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(results_body()))
            .mount(&server)
            .await;

        let retriever = MedicalRetriever::new(test_options(&server.uri())).unwrap();
        let snippets = retriever
            .search("cgm coverage", SourceClass::Web, 3)
            .await
            .unwrap();

        assert_eq!(snippets.len(), 1);
        assert_eq!(snippets[0].class, SourceClass::Web);
        assert!(snippets[0].snippet.contains("Coverage criteria"));
    }

    #[tokio::test]
    async fn medical_web_class_restricts_domains() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/search"))
            .and(body_partial_json(serde_json::json!({
                "includeDomains": MEDICAL_DOMAINS
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(results_body()))
            .expect(1)
            .mount(&server)
            .await;

        let retriever = MedicalRetriever::new(test_options(&server.uri())).unwrap();
        let snippets = retriever
            .search("cgm coverage", SourceClass::MedicalWeb, 3)
            .await
            .unwrap();
        assert_eq!(snippets[0].class, SourceClass::MedicalWeb);
    }

    #[tokio::test]
    async fn backend_error_is_a_retrieval_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let retriever = MedicalRetriever::new(test_options(&server.uri())).unwrap();
        let err = retriever
            .search("cgm coverage", SourceClass::Web, 3)
            .await
            .unwrap_err();
        assert!(matches!(err, GlucoraError::Retrieval { .. }));
    }
}
