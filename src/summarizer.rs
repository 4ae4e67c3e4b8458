//! Summarize the news with a tool-calling chat model.
//!
//! The model gets a fixed instruction and the [`NewsTool`] it can call to
//! read the feed. Every tool call is answered with the prepared news JSON
//! and the conversation continues until the model replies with text.

use crate::api::{ChatModel, ChatRequest, Message, NewsTool, ToolCall};
use crate::error::SummarizeError;
use std::error::Error;
use tracing::{debug, error, info, instrument};

/// The question put to the model.
pub const INSTRUCTION: &str = "What are the news in Germany? Give the most relevant news first (e.g. which are breaking or topics which are covered by multiple news). Summarize the topic with 4-10 sentences. For each topic also give one link.";

/// Page text used when summarization fails.
pub const SUMMARY_ERROR_PLACEHOLDER: &str =
    "An error occurred while summarizing the news. Please try again later.";

/// Upper bound on chat requests per summary.
pub const MAX_CHAT_TURNS: usize = 5;

/// Result of [`Summarizer::summarize_or_placeholder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    /// Markdown produced by the model, or the placeholder.
    pub text: String,
    /// `true` when `text` is [`SUMMARY_ERROR_PLACEHOLDER`].
    pub fallback: bool,
}

pub struct Summarizer<M> {
    model: M,
    model_name: String,
    verbose: bool,
}

impl<M: ChatModel> Summarizer<M> {
    pub fn new(model: M, model_name: impl Into<String>, verbose: bool) -> Self {
        Self {
            model,
            model_name: model_name.into(),
            verbose,
        }
    }

    fn answer(&self, call: &ToolCall, tool: &NewsTool) -> Message {
        if self.verbose {
            info!(tool = %call.function.name, id = %call.id, arguments = %call.function.arguments, "Model called tool");
        } else {
            debug!(tool = %call.function.name, id = %call.id, "Model called tool");
        }
        if call.function.name == NewsTool::NAME {
            Message::tool(&call.id, tool.call())
        } else {
            Message::tool(&call.id, format!("error: unknown tool '{}'", call.function.name))
        }
    }

    /// Run the conversation and return the model's final markdown.
    #[instrument(level = "info", skip_all, fields(model = %self.model_name))]
    pub async fn summarize(&self, tool: &NewsTool) -> Result<String, SummarizeError> {
        let mut messages = vec![Message::user(INSTRUCTION)];

        for turn in 1..=MAX_CHAT_TURNS {
            let request = ChatRequest {
                model: self.model_name.clone(),
                messages: messages.clone(),
                tools: vec![NewsTool::definition()],
            };
            let reply = self.model.complete(&request).await?;

            if reply.requested_tools().is_empty() {
                let text = reply.content.unwrap_or_default();
                if text.trim().is_empty() {
                    return Err(SummarizeError::EmptyResponse);
                }
                info!(turn, chars = text.chars().count(), "Received summary");
                return Ok(text);
            }

            let answers: Vec<Message> = reply
                .requested_tools()
                .iter()
                .map(|call| self.answer(call, tool))
                .collect();
            messages.push(reply);
            messages.extend(answers);
        }

        Err(SummarizeError::TooManyToolRounds(MAX_CHAT_TURNS))
    }

    /// Like [`Summarizer::summarize`], but never fails.
    ///
    /// On error the placeholder is returned. The error and its root cause are logged
    /// unless `ci` is set.
    pub async fn summarize_or_placeholder(&self, tool: &NewsTool, ci: bool) -> Summary {
        match self.summarize(tool).await {
            Ok(text) => Summary {
                text,
                fallback: false,
            },
            Err(e) => {
                if ci {
                    debug!("Summarization failed; using placeholder");
                } else {
                    error!(error = %e, cause = %root_cause(&e), "Summarization failed; using placeholder");
                }
                Summary {
                    text: SUMMARY_ERROR_PLACEHOLDER.to_string(),
                    fallback: true,
                }
            }
        }
    }
}

/// Message of the innermost error in the `source()` chain.
fn root_cause(e: &dyn Error) -> String {
    let mut current = e;
    while let Some(inner) = current.source() {
        current = inner;
    }
    current.to_string()
}
