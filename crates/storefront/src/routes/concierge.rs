//! Style concierge route handlers.
//!
//! A turn locks the visitor's conversation twice: once to append the message
//! and mark the concierge busy, once to append the reply. The lock is not
//! held across the completion call, and the session record is never written
//! by a turn. The call runs in its own task so a dropped connection still
//! finishes the turn and never leaves the concierge stuck busy.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Multipart, State},
};
use lumina_core::{ChatMessage, ChatPart, Concierge, ConciergeError};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::filters;
use crate::models::visitor_id;
use crate::services::Conversation;
use crate::state::AppState;

/// Multipart field carrying the outfit photo.
const IMAGE_FIELD: &str = "image";

/// Used when the upload does not declare an image type.
const DEFAULT_IMAGE_MIME: &str = "image/jpeg";

/// Chat message display data for templates.
#[derive(Clone)]
pub struct MessageView {
    pub is_user: bool,
    pub text: String,
    pub time: String,
}

impl From<&ChatMessage> for MessageView {
    fn from(message: &ChatMessage) -> Self {
        Self {
            is_user: message.is_user(),
            text: message.text.clone(),
            time: message.sent_at.format("%H:%M").to_string(),
        }
    }
}

/// Transcript display data for templates.
#[derive(Clone)]
pub struct ChatView {
    pub messages: Vec<MessageView>,
    pub busy: bool,
}

impl From<&Concierge> for ChatView {
    fn from(concierge: &Concierge) -> Self {
        Self {
            messages: concierge
                .transcript()
                .messages()
                .iter()
                .map(MessageView::from)
                .collect(),
            busy: concierge.is_busy(),
        }
    }
}

/// Text turn form data.
#[derive(Debug, Deserialize)]
pub struct MessageForm {
    #[serde(default)]
    pub message: String,
}

/// Transcript fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/chat_messages.html")]
pub struct ChatMessagesTemplate {
    pub chat: ChatView,
}

impl From<&Concierge> for ChatMessagesTemplate {
    fn from(concierge: &Concierge) -> Self {
        Self {
            chat: ChatView::from(concierge),
        }
    }
}

/// Render the transcript.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<ChatMessagesTemplate> {
    let conversation = conversation(&state, &session).await?;
    let concierge = conversation.lock().await;
    Ok(ChatMessagesTemplate::from(&*concierge))
}

/// Send a styling question.
///
/// Blank input and input sent while a reply is pending leave the transcript
/// unchanged and make no outbound call.
#[instrument(skip(state, session, form))]
pub async fn send_message(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<MessageForm>,
) -> Result<ChatMessagesTemplate> {
    let conversation = conversation(&state, &session).await?;
    let begun = conversation.lock().await.begin_text(&form.message);
    match begun {
        Ok(parts) => run_turn(state, conversation, parts).await,
        Err(e) => Ok(rejected(&conversation, e).await),
    }
}

/// Send an outfit photo for shoe recommendations.
#[instrument(skip(state, session, multipart))]
pub async fn send_image(
    State(state): State<AppState>,
    session: Session,
    mut multipart: Multipart,
) -> Result<ChatMessagesTemplate> {
    let (data, mime_type) = read_image(&mut multipart).await?;

    let conversation = conversation(&state, &session).await?;
    let begun = conversation.lock().await.begin_image(data, mime_type);
    match begun {
        Ok(parts) => run_turn(state, conversation, parts).await,
        Err(e) => Ok(rejected(&conversation, e).await),
    }
}

/// The visitor's conversation.
pub async fn conversation(state: &AppState, session: &Session) -> Result<Conversation> {
    let visitor = visitor_id(session).await?;
    Ok(state.conversations().get(visitor).await)
}

async fn rejected(conversation: &Conversation, reason: ConciergeError) -> ChatMessagesTemplate {
    tracing::debug!(%reason, "Concierge turn not started");
    ChatMessagesTemplate::from(&*conversation.lock().await)
}

/// Ask the service and append its reply.
async fn run_turn(
    state: AppState,
    conversation: Conversation,
    parts: Vec<ChatPart>,
) -> Result<ChatMessagesTemplate> {
    let task = tokio::spawn(async move {
        let reply = state.concierge().reply(&parts).await;
        let mut concierge = conversation.lock().await;
        concierge.finish(reply);
        ChatMessagesTemplate::from(&*concierge)
    });

    task.await
        .map_err(|e| AppError::Internal(format!("concierge task failed: {e}")))
}

/// Pull the `image` field out of a multipart upload.
///
/// A missing or empty field yields empty data, which the concierge treats as
/// an empty submission.
async fn read_image(multipart: &mut Multipart) -> Result<(Vec<u8>, String)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let mime_type = field
            .content_type()
            .unwrap_or(DEFAULT_IMAGE_MIME)
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        if !bytes.is_empty() && !mime_type.starts_with("image/") {
            return Err(AppError::BadRequest(format!(
                "expected an image upload, got {mime_type}"
            )));
        }

        return Ok((bytes.to_vec(), mime_type));
    }

    Ok((Vec::new(), DEFAULT_IMAGE_MIME.to_string()))
}
