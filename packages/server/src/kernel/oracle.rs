//! OpenAI-backed discovery oracle.
//!
//! One call per query: web search plus a strict `json_schema` response format
//! generated from [`ToolCandidate`], so the model either returns verifiable
//! candidate listings in our shape or an empty list.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};

use super::{BaseDiscoveryOracle, ToolCandidate};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-search-preview";

/// Instruction payload sent with every discovery call.
const DISCOVERY_INSTRUCTIONS: &str = r#"You are a research agent for an AI tool directory. Search the web and return AI tools and services that match the query.

Include BOTH classes of service:
1. AI-content generators: tools whose main job is generating text, images, video, audio, code or 3D assets.
2. AI-powered services: conventional products (email, CRM, hiring, travel, finance, support...) with substantial AI features.

Field rules:
- name: the product's official name, no suffixes like "- AI tool".
- website_url: the tool's own homepage as a full https URL. Never a directory page, app store page or social profile.
- description: 1-3 plain sentences about what the tool does.
- tagline: one short marketing-style sentence, no emoji.
- features: up to 6 short feature phrases.
- pricing: one of free, freemium, paid, subscription if the site states it.
- country, language: fill only when evident from the site.

Exclude tools everyone already knows: ChatGPT, Claude, Gemini, Copilot, Midjourney, DALL-E, Stable Diffusion, Grammarly, Notion, Canva, Jasper, Perplexity.

Aim for 30-100 listings per call. Only return entries you actually found on the web during this search; if you cannot verify listings for the query, return an empty list rather than inventing data."#;

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct JsonSchemaFormat {
    name: String,
    strict: bool,
    schema: serde_json::Value,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
    json_schema: JsonSchemaFormat,
}

/// Chat-completions request with web search and a strict response schema.
#[derive(Debug, Serialize)]
struct OracleRequest {
    model: String,
    messages: Vec<Message>,
    web_search_options: serde_json::Value,
    response_format: ResponseFormat,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseRaw {
    choices: Vec<ChatChoice>,
}

/// The oracle's whole answer: a bounded list of candidate tool records.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct DiscoveredToolList {
    pub services: Vec<ToolCandidate>,
}

/// OpenAI implementation of the discovery oracle
pub struct OpenAiOracle {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiOracle {
    pub fn new(api_key: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        })
    }

    /// Override the base URL (proxies, gateways).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Override the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn build_request(&self, query: &str, today: NaiveDate) -> OracleRequest {
        OracleRequest {
            model: self.model.clone(),
            messages: vec![
                Message {
                    role: "system",
                    content: DISCOVERY_INSTRUCTIONS.to_string(),
                },
                Message {
                    role: "user",
                    content: build_user_prompt(query, today),
                },
            ],
            web_search_options: serde_json::json!({}),
            response_format: ResponseFormat {
                format_type: "json_schema",
                json_schema: JsonSchemaFormat {
                    name: "discovered_tools".to_string(),
                    strict: true,
                    schema: openai_schema::<DiscoveredToolList>(),
                },
            },
        }
    }
}

fn build_user_prompt(query: &str, today: NaiveDate) -> String {
    format!("Search the web for: {}\nToday's date: {}", query, today)
}

#[async_trait]
impl BaseDiscoveryOracle for OpenAiOracle {
    async fn discover(&self, query: &str, today: NaiveDate) -> Result<Vec<ToolCandidate>> {
        let request = self.build_request(query, today);

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .context("Failed to send discovery request to OpenAI")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("OpenAI API error {}: {}", status, body);
        }

        let raw: ChatResponseRaw = response
            .json()
            .await
            .context("Failed to parse OpenAI response")?;

        let content = raw
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .context("No response choices from OpenAI")?;

        let listing: DiscoveredToolList = serde_json::from_str(&content)
            .context("Oracle response did not match the candidate schema")?;

        tracing::debug!(
            query = %query,
            candidates = listing.services.len(),
            "Oracle returned candidate listings"
        );

        Ok(listing.services)
    }
}

/// Generate an OpenAI-strict-mode-compatible JSON schema for `T`.
///
/// OpenAI requires `additionalProperties: false` on every object schema, all
/// properties listed in `required` (even nullable ones), and fully inlined
/// schemas with no `$ref`.
fn openai_schema<T: JsonSchema>() -> serde_json::Value {
    let schema = schema_for!(T);
    let mut value = serde_json::to_value(schema).unwrap_or_default();

    fix_object_schemas(&mut value);

    let definitions = value.get("definitions").cloned();
    if let Some(defs) = definitions {
        inline_refs(&mut value, &defs);
    }

    if let serde_json::Value::Object(map) = &mut value {
        map.remove("definitions");
        map.remove("$schema");
    }

    value
}

fn fix_object_schemas(value: &mut serde_json::Value) {
    match value {
        serde_json::Value::Object(map) => {
            if map.get("type") == Some(&serde_json::Value::String("object".to_string())) {
                map.insert(
                    "additionalProperties".to_string(),
                    serde_json::Value::Bool(false),
                );
                if let Some(serde_json::Value::Object(props)) = map.get("properties") {
                    let all_keys: Vec<serde_json::Value> = props
                        .keys()
                        .map(|k| serde_json::Value::String(k.clone()))
                        .collect();
                    map.insert("required".to_string(), serde_json::Value::Array(all_keys));
                }
            }
            for (_, v) in map.iter_mut() {
                fix_object_schemas(v);
            }
        }
        serde_json::Value::Array(arr) => {
            for item in arr.iter_mut() {
                fix_object_schemas(item);
            }
        }
        _ => {}
    }
}

fn inline_refs(value: &mut serde_json::Value, definitions: &serde_json::Value) {
    match value {
        serde_json::Value::Object(map) => {
            if let Some(serde_json::Value::String(ref_path)) = map.get("$ref").cloned() {
                if let Some(type_name) = ref_path.strip_prefix("#/definitions/") {
                    if let Some(def) = definitions.get(type_name) {
                        *value = def.clone();
                        inline_refs(value, definitions);
                        return;
                    }
                }
            }
            for (_, v) in map.iter_mut() {
                inline_refs(v, definitions);
            }
        }
        serde_json::Value::Array(arr) => {
            for item in arr.iter_mut() {
                inline_refs(item, definitions);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_is_inlined_and_strict() {
        let schema = openai_schema::<DiscoveredToolList>();
        let obj = schema.as_object().unwrap();

        assert!(!obj.contains_key("definitions"));
        assert!(!obj.contains_key("$schema"));
        assert_eq!(
            obj.get("additionalProperties"),
            Some(&serde_json::Value::Bool(false))
        );

        let services = obj
            .get("properties")
            .and_then(|p| p.get("services"))
            .expect("schema should expose a services array");
        let item = services.get("items").expect("services should have items");

        // Candidate schema is inlined, not a $ref
        assert!(item.get("$ref").is_none());
        let required: Vec<&str> = item
            .get("required")
            .and_then(|r| r.as_array())
            .unwrap()
            .iter()
            .filter_map(|v| v.as_str())
            .collect();
        assert!(required.contains(&"name"));
        assert!(required.contains(&"website_url"));
        assert!(required.contains(&"pricing"));
    }

    #[test]
    fn user_prompt_carries_query_and_date() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let prompt = build_user_prompt("new AI tools", date);
        assert!(prompt.contains("new AI tools"));
        assert!(prompt.contains("2025-06-01"));
    }

    #[test]
    fn oracle_payload_parses_into_candidates() {
        let content = r#"{
            "services": [
                {"name": "Foo", "website_url": "https://foo.ai", "pricing": "paid"},
                {"name": "Bar", "website_url": "https://bar.ai", "features": ["x"], "country": "US"}
            ]
        }"#;
        let listing: DiscoveredToolList = serde_json::from_str(content).unwrap();
        assert_eq!(listing.services.len(), 2);
        assert_eq!(
            listing.services[0].pricing,
            Some(crate::domains::service::models::Pricing::Paid)
        );
        assert!(listing.services[0].description.is_empty());
    }
}
