// Hosted topic labels via an OpenAI-compatible chat-completions API.
//
// One request per topic: the representative chunks and keywords go into a
// short prompt, and the model answers with a `topic: <label>` line. The
// label replaces the keywords as the topic's representation: the label with
// a weight of 1.0, padded with empty zero-weight slots to the usual keyword
// count. Failures are not retried; a failed call fails the fit.
//
// API docs: https://platform.openai.com/docs/api-reference/chat

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::model::KeywordWeight;
use super::traits::{RepresentationModel, TopicDraft};
use crate::output::truncate_chars;

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Representative chunks are cut to this many characters in the prompt.
const MAX_DOC_CHARS: usize = 300;

/// Length of a hosted representation, label included.
const REPRESENTATION_SLOTS: usize = 10;

/// Topic labels from a hosted chat model.
pub struct OpenAiRepresentation {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiRepresentation {
    pub fn new(api_key: String, model: String, base_url: &str) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn label(&self, topic: &TopicDraft) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: build_prompt(topic),
            }],
            temperature: 0.0,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .context("Failed to call OpenAI chat completions API")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("OpenAI API returned {}: {}", status, body);
        }

        let result: ChatResponse = response
            .json()
            .await
            .context("Failed to parse OpenAI chat completions response")?;

        let reply = result
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .unwrap_or_default();

        let label = parse_label(&reply);
        debug!(topic = topic.topic_id, label = %label, "Labeled topic");
        Ok(label)
    }
}

#[async_trait]
impl RepresentationModel for OpenAiRepresentation {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn represent(&self, topics: &[TopicDraft]) -> Result<Vec<Vec<KeywordWeight>>> {
        if self.api_key.trim().is_empty() {
            anyhow::bail!(
                "OpenAI representation requested but no API key is configured. \
                 Set OPENAI_API_KEY or provide a key."
            );
        }

        let mut representations = Vec::with_capacity(topics.len());
        for topic in topics {
            let label = self
                .label(topic)
                .await
                .with_context(|| format!("Failed to label topic {}", topic.topic_id))?;
            representations.push(label_representation(label));
        }
        Ok(representations)
    }
}

/// `[(label, 1.0), ("", 0.0), ...]`, `REPRESENTATION_SLOTS` entries long.
fn label_representation(label: String) -> Vec<KeywordWeight> {
    let mut representation = Vec::with_capacity(REPRESENTATION_SLOTS);
    representation.push((label, 1.0));
    representation.resize(REPRESENTATION_SLOTS, (String::new(), 0.0));
    representation
}

/// The prompt sent for one topic.
pub fn build_prompt(topic: &TopicDraft) -> String {
    let documents: String = topic
        .representative_docs
        .iter()
        .map(|doc| format!("- {}\n", truncate_chars(doc, MAX_DOC_CHARS)))
        .collect();
    let keywords: Vec<&str> = topic.keywords.iter().map(|(w, _)| w.as_str()).collect();

    format!(
        "I have a topic that contains the following documents:\n\
         {documents}\
         The topic is described by the following keywords: {}\n\n\
         Based on the information above, extract a short topic label in the following format:\n\
         topic: <topic label>",
        keywords.join(", ")
    )
}

/// Pull the label out of a `topic: <label>` reply.
///
/// Replies without the prefix are used whole. The result may be empty.
pub fn parse_label(reply: &str) -> String {
    let trimmed = reply.trim();
    let prefix = "topic:";
    let line = trimmed
        .lines()
        .map(str::trim)
        .find(|line| {
            line.get(..prefix.len())
                .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
        })
        .map(|line| &line[prefix.len()..])
        .unwrap_or(trimmed);
    line.trim().trim_matches('"').trim().to_string()
}

// --- chat completions request/response types ---

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChatMessage,
}
