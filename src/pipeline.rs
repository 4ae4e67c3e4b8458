//! One run: fetch → summarize → render → write.
//!
//! Fetch and write faults end the run. Summarization faults are absorbed by
//! [`Summarizer::summarize_or_placeholder`], so a page is always written once
//! the feed has been loaded.

use crate::api::{ChatModel, NewsTool};
use crate::config::Settings;
use crate::error::PipelineError;
use crate::outputs::html;
use crate::scrapers::tagesschau;
use crate::summarizer::Summarizer;
use reqwest::Client;
use std::path::PathBuf;
use tracing::{info, instrument};

/// What a run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Items handed to the model after truncation.
    pub items: usize,
    /// Size of the serialized item list.
    pub payload_bytes: usize,
    /// The placeholder was written instead of a summary.
    pub fallback: bool,
    pub output: PathBuf,
}

#[instrument(level = "info", skip_all, fields(profile = %settings.profile))]
pub async fn run<M: ChatModel>(
    client: &Client,
    model: M,
    settings: &Settings,
) -> Result<RunReport, PipelineError> {
    let news = tagesschau::latest_news(
        client,
        &settings.endpoint,
        &settings.regions,
        settings.max_payload_bytes,
    )
    .await?;
    let items = news.items.len();
    let payload_bytes = news.json.len();

    let tool = NewsTool::new(news.json);
    let summarizer = Summarizer::new(model, &settings.model, settings.verbose);
    let summary = summarizer.summarize_or_placeholder(&tool, settings.ci).await;

    let page = html::render_page(&summary.text, &settings.page_title);
    html::write_page(&settings.output, &page).await?;

    info!(
        items,
        payload_bytes,
        fallback = summary.fallback,
        path = %settings.output.display(),
        "Run complete"
    );
    Ok(RunReport {
        items,
        payload_bytes,
        fallback: summary.fallback,
        output: settings.output.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ChatRequest, Message};
    use crate::config::{DEFAULT_MAX_PAYLOAD_BYTES, DEFAULT_PAGE_TITLE, DEFAULT_REGIONS};
    use crate::error::{FetchError, SummarizeError};
    use crate::summarizer::SUMMARY_ERROR_PLACEHOLDER;
    use serde_json::json;
    use std::path::Path;
    use std::time::Duration;

    /// Calls the news tool once, then answers with fixed text.
    struct FixedModel(&'static str);

    impl ChatModel for FixedModel {
        async fn complete(&self, request: &ChatRequest) -> Result<Message, SummarizeError> {
            if request.messages.len() == 1 {
                let call = json!({
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_1",
                        "type": "function",
                        "function": {"name": NewsTool::NAME, "arguments": "{}"}
                    }]
                });
                return Ok(serde_json::from_value(call).unwrap());
            }
            Ok(Message::assistant(self.0))
        }
    }

    struct FailingModel;

    impl ChatModel for FailingModel {
        async fn complete(&self, _request: &ChatRequest) -> Result<Message, SummarizeError> {
            Err(SummarizeError::MissingApiKey)
        }
    }

    fn settings(endpoint: String, output: &Path) -> Settings {
        Settings {
            endpoint,
            regions: DEFAULT_REGIONS.to_vec(),
            max_payload_bytes: DEFAULT_MAX_PAYLOAD_BYTES,
            timeout: Duration::from_secs(5),
            page_title: DEFAULT_PAGE_TITLE.to_string(),
            profile: "standard".to_string(),
            model: "gpt-4o".to_string(),
            verbose: false,
            output: output.to_path_buf(),
            base_url: "http://127.0.0.1:9".to_string(),
            api_key: None,
            ci: true,
        }
    }

    fn homepage() -> String {
        json!({
            "news": [{
                "title": "Haushalt beschlossen",
                "content": [{"type": "text", "value": "Der Bundestag hat den Haushalt beschlossen."}],
                "breakingNews": false,
                "detailsweb": "https://www.tagesschau.de/inland/haushalt"
            }],
            "regional": [{
                "title": "Stau auf der A8",
                "content": [{"type": "text", "value": "Zwischen Stuttgart und Ulm geht nichts mehr."}],
                "breakingNews": true,
                "detailsweb": "https://www.tagesschau.de/regional/a8",
                "regionId": 1
            }]
        })
        .to_string()
    }

    async fn serve(server: &mut mockito::Server, body: String) -> mockito::Mock {
        server
            .mock("GET", "/api2u/homepage")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .expect_at_least(1)
            .create_async()
            .await
    }

    #[tokio::test]
    async fn test_run_writes_summary_page() {
        let mut server = mockito::Server::new_async().await;
        let mock = serve(&mut server, homepage()).await;
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("public/news.html");
        let settings = settings(format!("{}/api2u/homepage", server.url()), &out);

        let report = run(&Client::new(), FixedModel("# Heute\nIt's quiet."), &settings)
            .await
            .unwrap();

        assert_eq!(report.items, 2);
        assert!(!report.fallback);
        assert_eq!(report.output, out);
        let page = std::fs::read_to_string(&out).unwrap();
        assert!(page.contains("marked.parse('# Heute\\nIt\\'s quiet.');"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_run_writes_placeholder_on_summary_failure() {
        let mut server = mockito::Server::new_async().await;
        let _mock = serve(&mut server, homepage()).await;
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("news.html");
        let settings = settings(format!("{}/api2u/homepage", server.url()), &out);

        let report = run(&Client::new(), FailingModel, &settings).await.unwrap();

        assert!(report.fallback);
        let page = std::fs::read_to_string(&out).unwrap();
        assert!(page.contains(SUMMARY_ERROR_PLACEHOLDER));
    }

    #[tokio::test]
    async fn test_run_with_empty_feed() {
        let mut server = mockito::Server::new_async().await;
        let _mock = serve(&mut server, r#"{"news": [], "regional": []}"#.to_string()).await;
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("news.html");
        let settings = settings(format!("{}/api2u/homepage", server.url()), &out);

        let report = run(&Client::new(), FixedModel("Keine Nachrichten."), &settings)
            .await
            .unwrap();

        assert_eq!(report.items, 0);
        assert_eq!(report.payload_bytes, 2);
        let page = std::fs::read_to_string(&out).unwrap();
        assert!(page.contains("<!doctype html>"));
        assert!(page.trim_end().ends_with("</html>"));
    }

    #[tokio::test]
    async fn test_identical_inputs_give_identical_pages() {
        let mut server = mockito::Server::new_async().await;
        let _mock = serve(&mut server, homepage()).await;
        let tmp = tempfile::tempdir().unwrap();
        let first = tmp.path().join("first.html");
        let second = tmp.path().join("second.html");
        let endpoint = format!("{}/api2u/homepage", server.url());

        run(&Client::new(), FixedModel("Text 'a'\nb"), &settings(endpoint.clone(), &first))
            .await
            .unwrap();
        run(&Client::new(), FixedModel("Text 'a'\nb"), &settings(endpoint, &second))
            .await
            .unwrap();

        assert_eq!(std::fs::read(&first).unwrap(), std::fs::read(&second).unwrap());
    }

    #[tokio::test]
    async fn test_fetch_failure_propagates_without_writing() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api2u/homepage")
            .with_status(500)
            .create_async()
            .await;
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("news.html");
        let settings = settings(format!("{}/api2u/homepage", server.url()), &out);

        let err = run(&Client::new(), FixedModel("unused"), &settings)
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::Fetch(FetchError::Status { .. })));
        assert!(!out.exists());
    }
}
