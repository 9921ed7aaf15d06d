// SPDX-FileCopyrightText: 2026 Glucora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Study search against the ClinicalTrials.gov v2 API.

use glucora_core::{GlucoraError, SourceClass, SourceSnippet};
use serde::Deserialize;

use crate::clip;

#[derive(Debug, Deserialize)]
struct StudiesResponse {
    #[serde(default)]
    studies: Vec<Study>,
}

#[derive(Debug, Deserialize)]
struct Study {
    #[serde(rename = "protocolSection")]
    protocol_section: ProtocolSection,
}

#[derive(Debug, Deserialize)]
struct ProtocolSection {
    #[serde(rename = "identificationModule")]
    identification: IdentificationModule,
    #[serde(rename = "descriptionModule", default)]
    description: Option<DescriptionModule>,
}

#[derive(Debug, Deserialize)]
struct IdentificationModule {
    #[serde(rename = "nctId")]
    nct_id: String,
    #[serde(rename = "briefTitle", default)]
    brief_title: String,
}

#[derive(Debug, Default, Deserialize)]
struct DescriptionModule {
    #[serde(rename = "briefSummary", default)]
    brief_summary: String,
}

pub(crate) async fn search(
    client: &reqwest::Client,
    base_url: &str,
    query: &str,
    limit: usize,
) -> Result<Vec<SourceSnippet>, GlucoraError> {
    let url = format!("{base_url}/studies");
    let response: StudiesResponse = client
        .get(&url)
        .query(&[
            ("query.term", query),
            ("pageSize", &limit.to_string()),
        ])
        .send()
        .await
        .map_err(|e| GlucoraError::Retrieval {
            message: format!("clinical trials request failed: {e}"),
            source: Some(Box::new(e)),
        })?
        .error_for_status()
        .map_err(|e| GlucoraError::Retrieval {
            message: format!("clinical trials request failed: {e}"),
            source: Some(Box::new(e)),
        })?
        .json()
        .await
        .map_err(|e| GlucoraError::Retrieval {
            message: format!("failed to parse clinical trials response: {e}"),
            source: Some(Box::new(e)),
        })?;

    Ok(response
        .studies
        .into_iter()
        .take(limit)
        .map(|study| {
            let id = study.protocol_section.identification;
            let summary = study
                .protocol_section
                .description
                .unwrap_or_default()
                .brief_summary;
            SourceSnippet {
                title: clip(&id.brief_title, 200),
                url: format!("https://clinicaltrials.gov/study/{}", id.nct_id),
                snippet: clip(&summary, 300),
                class: SourceClass::ClinicalTrials,
            }
        })
        .collect())
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
    async fn studies_map_to_snippets() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v2/studies"))
            .and(query_param("query.term", "tirzepatide type 2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "studies": [{
                    "protocolSection": {
                        "identificationModule": {
                            "nctId": "NCT05000000",
                            "briefTitle": "Tirzepatide in Adults With Type 2 Diabetes"
                        },
                        "descriptionModule": {
                            "briefSummary": "A randomized trial of tirzepatide dosing."
                        }
                    }
                }]
            })))
            .mount(&server)
            .await;

        let retriever = MedicalRetriever::new(test_options(&server.uri())).unwrap();
        let snippets = retriever
            .search("tirzepatide type 2", SourceClass::ClinicalTrials, 5)
            .await
            .unwrap();

        assert_eq!(snippets.len(), 1);
        assert_eq!(
            snippets[0].url,
            "https://clinicaltrials.gov/study/NCT05000000"
        );
        assert_eq!(snippets[0].class, SourceClass::ClinicalTrials);
        assert!(snippets[0].snippet.contains("randomized trial"));
    }

    #[tokio::test]
    async fn missing_description_is_tolerated() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v2/studies"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "studies": [{
                    "protocolSection": {
                        "identificationModule": {
                            "nctId": "NCT05000001",
                            "briefTitle": "Untitled protocol"
                        }
                    }
                }]
            })))
            .mount(&server)
            .await;

        let retriever = MedicalRetriever::new(test_options(&server.uri())).unwrap();
        let snippets = retriever
            .search("anything", SourceClass::ClinicalTrials, 5)
            .await
            .unwrap();
        assert_eq!(snippets.len(), 1);
        assert!(snippets[0].snippet.is_empty());
    }
}
