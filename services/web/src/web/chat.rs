//! services/web/src/web/chat.rs
//!
//! The question-answering page. The posted form may repeat `selected_files`,
//! so it is decoded with `form_urlencoded` rather than a struct extractor.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::Response,
};
use bytes::Bytes;
use serde::Serialize;
use std::sync::Arc;
use study_hub_core::context::answer_question;
use tracing::info;

use crate::web::{
    documents::{document_views, DocumentView},
    render_page,
    state::AppState,
    HandlerError,
};

#[derive(Serialize)]
struct ChatBody {
    documents: Vec<DocumentView>,
    question: String,
    answer: String,
}

/// A decoded chat submission.
#[derive(Debug, PartialEq)]
pub struct ChatForm {
    pub question: String,
    pub selected_files: Vec<String>,
}

impl ChatForm {
    /// Returns `None` when the form has no `question` field.
    pub fn parse(body: &[u8]) -> Option<Self> {
        let mut question = None;
        let mut selected_files = Vec::new();
        for (key, value) in url::form_urlencoded::parse(body) {
            match key.as_ref() {
                "question" => question = Some(value.into_owned()),
                "selected_files" => selected_files.push(value.into_owned()),
                _ => {}
            }
        }
        Some(Self {
            question: question?,
            selected_files,
        })
    }
}

/// GET /chat - The empty chat form
#[utoipa::path(
    get,
    path = "/chat",
    responses(
        (status = 200, description = "Chat page"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn chat_page(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, HandlerError> {
    let body = ChatBody {
        documents: document_views(&state).await?,
        question: String::new(),
        answer: String::new(),
    };
    render_page(&state, &headers, "chat.html", None, body).await
}

/// POST /chat - Answer a question using the selected documents as context
///
/// Unreadable documents and answer generator failures are reported inside the
/// answer text; the page itself still renders.
#[utoipa::path(
    post,
    path = "/chat",
    request_body(content_type = "application/x-www-form-urlencoded", description = "`question` plus zero or more `selected_files`."),
    responses(
        (status = 200, description = "Chat page with the answer"),
        (status = 400, description = "Malformed form (missing question)"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn chat_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, HandlerError> {
    let form = ChatForm::parse(&body).ok_or((
        StatusCode::BAD_REQUEST,
        "The form must include a question field".to_string(),
    ))?;

    info!(
        "Answering a question over {} selected document(s)",
        form.selected_files.len()
    );
    let answer = answer_question(
        state.answer_generator.as_ref(),
        state.files.as_ref(),
        &form.selected_files,
        &form.question,
    )
    .await;

    let body = ChatBody {
        documents: document_views(&state).await?,
        question: form.question,
        answer,
    };
    render_page(&state, &headers, "chat.html", None, body).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_selections_keep_their_order() {
        let form = ChatForm::parse(
            b"selected_files=b.txt&question=What+is+%C3%A9%3F&selected_files=a.pdf",
        )
        .unwrap();
        assert_eq!(form.question, "What is é?");
        assert_eq!(form.selected_files, vec!["b.txt", "a.pdf"]);
    }

    #[test]
    fn question_is_required() {
        assert_eq!(ChatForm::parse(b"selected_files=a.txt"), None);
        assert_eq!(
            ChatForm::parse(b"question="),
            Some(ChatForm {
                question: String::new(),
                selected_files: vec![],
            })
        );
    }
}
