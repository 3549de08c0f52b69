use axum::{
    Form, Json,
    extract::{Path, State, rejection::FormRejection},
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Response},
};
use tracing::{error, warn};

use keepsake_types::api::{CreateCapsuleForm, CreateCapsuleResponse, ErrorResponse};

use crate::AppState;
use crate::error::CapsuleError;
use crate::pages::{self, CapsuleView};
use crate::service::{NewCapsuleRequest, Revealed};

const KEEPSAKE_FILENAME: &str = "valentine-keepsake.png";

/// Run blocking capsule work (SQLite, AES, rasterizing) off the async runtime.
async fn blocking<T, F>(state: &AppState, f: F) -> Result<T, CapsuleError>
where
    F: FnOnce(&crate::AppStateInner) -> Result<T, CapsuleError> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    tokio::task::spawn_blocking(move || f(state.as_ref()))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            CapsuleError::Storage(anyhow::anyhow!("worker task failed"))
        })?
}

/// GET /: the creation form.
pub async fn index() -> Html<String> {
    Html(pages::create_page())
}

/// POST /: seal a message and answer with its shareable link.
pub async fn create_capsule(
    State(state): State<AppState>,
    headers: HeaderMap,
    form: Result<Form<CreateCapsuleForm>, FormRejection>,
) -> Response {
    let Form(form) = match form {
        Ok(form) => form,
        Err(rejection) => {
            warn!("Rejected capsule form: {}", rejection.body_text());
            let message = format!("Invalid form submission: {}", rejection.body_text());
            return (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(message))).into_response();
        }
    };

    let req = NewCapsuleRequest {
        message: form.message,
        // Capsules open on the day they are written; see DESIGN.md.
        unlock_at: None,
        sender_name: form.sender_name,
        recipient_name: form.recipient_name,
        title: form.title,
    };

    match blocking(&state, move |s| s.service.create_with(req)).await {
        Ok(id) => {
            let link = capsule_link(state.public_url.as_deref(), &headers, &id);
            Json(CreateCapsuleResponse { link }).into_response()
        }
        Err(e) => {
            let message = match &e {
                CapsuleError::Validation(msg) => msg.clone(),
                CapsuleError::EncryptionUnavailable => {
                    error!("Capsule rejected: {}", e);
                    "Server configuration error. Encryption not available.".to_string()
                }
                _ => {
                    error!("Error saving message: {}", e);
                    "Failed to save message.".to_string()
                }
            };
            (e.status(), Json(ErrorResponse::new(message))).into_response()
        }
    }
}

/// GET /v/{id}: locked notice or the unlocked message.
pub async fn view_capsule(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let lookup = id.clone();
    let result = blocking(&state, move |s| {
        let capsule = s.service.fetch(&lookup)?;
        let revealed = s.service.reveal(&capsule)?;
        Ok((capsule, revealed))
    })
    .await;

    match result {
        Ok((capsule, revealed)) => {
            let (unlock_at, message) = match &revealed {
                Revealed::Locked { unlock_at } => (*unlock_at, None),
                Revealed::Unlocked(text) => {
                    let unlock_at = capsule.unlock_at.unwrap_or_else(|| state.service.today());
                    (unlock_at, Some(text.as_str()))
                }
            };
            Html(pages::view_page(&CapsuleView {
                id: &capsule.id,
                title: capsule.title.as_deref(),
                sender_name: capsule.sender_name.as_deref(),
                recipient_name: capsule.recipient_name.as_deref(),
                created_at: capsule.created_at,
                unlock_at,
                message,
            }))
            .into_response()
        }
        Err(e) => {
            let message = match &e {
                CapsuleError::NotFound(_) => "Message not found 💔",
                CapsuleError::DecryptionFailed(_) => {
                    "This message could not be opened. It may be from an older version of the app. 💔"
                }
                CapsuleError::EncryptionUnavailable => "Server configuration error. Cannot decrypt message.",
                _ => {
                    error!("Unexpected error viewing message {}: {}", id, e);
                    "Something went wrong while loading the message. 💔"
                }
            };
            (e.status(), Html(pages::error_page(message))).into_response()
        }
    }
}

/// GET /generate-image/{id}: the keepsake PNG as a download.
pub async fn generate_image(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let lookup = id.clone();
    let result = blocking(&state, move |s| {
        let capsule = s.service.fetch(&lookup)?;
        if s.image_requires_unlock && !s.service.is_unlocked(&capsule) {
            return Ok(None);
        }
        // Unless configured otherwise this skips the unlock gate; see DESIGN.md.
        let message = s.service.decrypt(&capsule)?;
        let png = s.renderer.render(&message, capsule.title.as_deref())?;
        Ok(Some(png))
    })
    .await;

    match result {
        Ok(Some(png)) => (
            [
                (header::CONTENT_TYPE, "image/png".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", KEEPSAKE_FILENAME),
                ),
            ],
            png,
        )
            .into_response(),
        Ok(None) => (StatusCode::FORBIDDEN, "Message is still locked").into_response(),
        Err(CapsuleError::NotFound(_)) => (StatusCode::NOT_FOUND, "Message not found").into_response(),
        Err(e) => {
            error!("Error generating image for {}: {}", id, e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to generate image").into_response()
        }
    }
}

/// Absolute link to a capsule's view page. Prefers the configured public URL,
/// then the request's Host header.
pub fn capsule_link(public_url: Option<&str>, headers: &HeaderMap, id: &str) -> String {
    if let Some(base) = public_url {
        return format!("{}/v/{}", base.trim_end_matches('/'), id);
    }

    let host = headers.get(header::HOST).and_then(|v| v.to_str().ok());
    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("http");
    match host {
        Some(host) => format!("{}://{}/v/{}", scheme, host, id),
        None => format!("/v/{}", id),
    }
}
