// SPDX-FileCopyrightText: 2026 Glucora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! PubMed search via the NCBI E-utilities JSON API.
//!
//! Two-step protocol: `esearch.fcgi` returns matching article ids,
//! `esummary.fcgi` returns their metadata.

use std::collections::HashMap;

use glucora_core::{GlucoraError, SourceClass, SourceSnippet};
use serde::Deserialize;
use tracing::debug;

use crate::clip;

#[derive(Debug, Deserialize)]
struct ESearchResponse {
    esearchresult: ESearchResult,
}

#[derive(Debug, Deserialize)]
struct ESearchResult {
    #[serde(default)]
    idlist: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ESummaryResponse {
    result: ESummaryResult,
}

#[derive(Debug, Deserialize)]
struct ESummaryResult {
    #[serde(default)]
    uids: Vec<String>,
    #[serde(flatten)]
    entries: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ArticleSummary {
    #[serde(default)]
    title: String,
    #[serde(default)]
    fulljournalname: String,
    #[serde(default)]
    pubdate: String,
}

pub(crate) async fn search(
    client: &reqwest::Client,
    base_url: &str,
    query: &str,
    limit: usize,
) -> Result<Vec<SourceSnippet>, GlucoraError> {
    let search_url = format!("{base_url}/esearch.fcgi");
    let search: ESearchResponse = client
        .get(&search_url)
        .query(&[
            ("db", "pubmed"),
            ("term", query),
            ("retmode", "json"),
            ("retmax", &limit.to_string()),
            ("sort", "relevance"),
        ])
        .send()
        .await
        .map_err(request_error)?
        .error_for_status()
        .map_err(request_error)?
        .json()
        .await
        .map_err(parse_error)?;

    let ids = search.esearchresult.idlist;
    if ids.is_empty() {
        debug!(query, "pubmed search returned no ids");
        return Ok(Vec::new());
    }

    let summary_url = format!("{base_url}/esummary.fcgi");
    let summary: ESummaryResponse = client
        .get(&summary_url)
        .query(&[
            ("db", "pubmed"),
            ("id", ids.join(",").as_str()),
            ("retmode", "json"),
        ])
        .send()
        .await
        .map_err(request_error)?
        .error_for_status()
        .map_err(request_error)?
        .json()
        .await
        .map_err(parse_error)?;

    let mut snippets = Vec::new();
    for uid in &summary.result.uids {
        let Some(raw) = summary.result.entries.get(uid) else {
            continue;
        };
        let Ok(article) = serde_json::from_value::<ArticleSummary>(raw.clone()) else {
            continue;
        };
        if article.title.is_empty() {
            continue;
        }
        snippets.push(SourceSnippet {
            title: clip(&article.title, 200),
            url: format!("https://pubmed.ncbi.nlm.nih.gov/{uid}/"),
            snippet: clip(
                &format!("{} ({})", article.fulljournalname, article.pubdate),
                300,
            ),
            class: SourceClass::Pubmed,
        });
        if snippets.len() >= limit {
            break;
        }
    }
    Ok(snippets)
}

fn request_error(e: reqwest::Error) -> GlucoraError {
    GlucoraError::Retrieval {
        message: format!("pubmed request failed: {e}"),
        source: Some(Box::new(e)),
    }
}

fn parse_error(e: reqwest::Error) -> GlucoraError {
    GlucoraError::Retrieval {
        message: format!("failed to parse pubmed response: {e}"),
        source: Some(Box::new(e)),
    }
}

#[cfg(test)]
mod tests {
    use glucora_core::RetrieveAdapter;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::MedicalRetriever;
    use crate::tests::test_options;

    use super::*;

    #[tokio::test]
    async fn two_step_search_builds_snippets() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/entrez/eutils/esearch.fcgi"))
            .and(query_param("db", "pubmed"))
            .and(query_param("term", "metformin"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "esearchresult": {"idlist": ["11111", "22222"]}
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/entrez/eutils/esummary.fcgi"))
            .and(query_param("id", "11111,22222"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "result": {
                    "uids": ["11111", "22222"],
                    "11111": {
                        "title": "Metformin and cardiovascular outcomes",
                        "fulljournalname": "Diabetes Care",
                        "pubdate": "2026 Jan"
                    },
                    "22222": {
                        "title": "Metformin in prediabetes",
                        "fulljournalname": "The Lancet",
                        "pubdate": "2025 Nov"
                    }
                }
            })))
            .mount(&server)
            .await;

        let retriever = MedicalRetriever::new(test_options(&server.uri())).unwrap();
        let snippets = retriever
            .search("metformin", SourceClass::Pubmed, 5)
            .await
            .unwrap();

        assert_eq!(snippets.len(), 2);
        assert_eq!(snippets[0].title, "Metformin and cardiovascular outcomes");
        assert_eq!(snippets[0].url, "https://pubmed.ncbi.nlm.nih.gov/11111/");
        assert!(snippets[0].snippet.contains("Diabetes Care"));
        assert_eq!(snippets[0].class, SourceClass::Pubmed);
    }

    #[tokio::test]
    async fn empty_id_list_short_circuits() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/entrez/eutils/esearch.fcgi"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "esearchresult": {"idlist": []}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let retriever = MedicalRetriever::new(test_options(&server.uri())).unwrap();
        let snippets = retriever
            .search("nonexistent topic", SourceClass::Pubmed, 5)
            .await
            .unwrap();
        assert!(snippets.is_empty());
    }
}
