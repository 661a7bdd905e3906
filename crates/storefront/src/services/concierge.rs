//! Style concierge: turns visitor input into a single completion request.
//!
//! Every failure is logged and answered with a fixed fallback message, so the
//! visitor always gets exactly one reply per turn.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use lumina_core::{ChatPart, catalog};
use secrecy::SecretString;
use tracing::instrument;

use crate::config::GeminiConfig;
use crate::services::gemini::{GeminiClient, GeminiError, InlineData, Part};

/// Reply used when a text turn cannot be answered.
pub const TEXT_FALLBACK: &str = "I apologize, my creative senses are currently resting. How else may I assist you with our collection?";

/// Reply used when an outfit photo cannot be analyzed.
pub const IMAGE_FALLBACK: &str =
    "I couldn't quite see the outfit clearly. Could you describe it to me?";

/// Concierge backed by Gemini.
///
/// Without an API key every turn is answered with the fallback.
#[derive(Debug, Clone)]
pub struct ConciergeService {
    client: Option<GeminiClient>,
    system_instruction: String,
    temperature: f32,
}

impl ConciergeService {
    /// Build the service from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &GeminiConfig) -> Result<Self, GeminiError> {
        let client = config
            .api_key
            .clone()
            .map(|key: SecretString| GeminiClient::new(config, key))
            .transpose()?;

        if client.is_none() {
            tracing::warn!("GEMINI_API_KEY not set; concierge will answer with fallback replies");
        }

        Ok(Self {
            client,
            system_instruction: system_instruction(),
            temperature: config.temperature,
        })
    }

    /// Whether outbound calls are enabled.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.client.is_some()
    }

    /// Answer a free-text styling question.
    pub async fn advise(&self, message: &str) -> String {
        self.reply(&[ChatPart::Text(message.to_string())]).await
    }

    /// Recommend shoes for an outfit photo.
    pub async fn analyze_outfit(&self, data: Vec<u8>, mime_type: &str) -> String {
        self.reply(&[
            ChatPart::Image {
                data,
                mime_type: mime_type.to_string(),
            },
            ChatPart::Text(lumina_core::chat::IMAGE_INSTRUCTION.to_string()),
        ])
        .await
    }

    /// Send the parts of one turn and return the reply or the fallback.
    ///
    /// Turns carrying an image are sent without a temperature and fall back to
    /// the image message.
    #[instrument(skip(self, parts), fields(parts = parts.len()))]
    pub async fn reply(&self, parts: &[ChatPart]) -> String {
        let has_image = parts.iter().any(|p| matches!(p, ChatPart::Image { .. }));
        let fallback = if has_image { IMAGE_FALLBACK } else { TEXT_FALLBACK };

        let Some(client) = &self.client else {
            return fallback.to_string();
        };

        let temperature = (!has_image).then_some(self.temperature);
        match client
            .generate(to_wire_parts(parts), &self.system_instruction, temperature)
            .await
        {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %e, image = has_image, "Concierge request failed");
                fallback.to_string()
            }
        }
    }
}

fn to_wire_parts(parts: &[ChatPart]) -> Vec<Part> {
    parts
        .iter()
        .map(|part| match part {
            ChatPart::Text(text) => Part::Text(text.clone()),
            ChatPart::Image { data, mime_type } => Part::InlineData(InlineData {
                mime_type: mime_type.clone(),
                data: STANDARD.encode(data),
            }),
        })
        .collect()
}

/// The concierge persona with the catalog embedded as JSON.
#[must_use]
pub fn system_instruction() -> String {
    let catalog_json = serde_json::to_string_pretty(catalog::all()).unwrap_or_default();

    format!(
        "You are the \"Lumina Style Concierge\", a high-end personal shopper for the LUMINA shoe brand.
Your goal is to help customers find the perfect shoes from our catalog.

Our current collection:
{catalog_json}

Instructions:
1. Be sophisticated, warm, and helpful.
2. If a user describes an outfit or occasion, recommend 1-2 specific shoes from our catalog.
3. Explain WHY the shoes match (color theory, style, formality).
4. If they ask for something we don't have, politely suggest the closest alternative from our collection.
5. Keep responses concise and elegant.
6. Use Markdown for formatting if needed (bolding shoe names)."
    )
}
