use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use log::{error, warn};

use super::AppState;
use crate::{ContactError, ContactPayload, ContactResponse, MailReceipt};

const SENT_MESSAGE: &str = "Message sent successfully!";

/// Maps a contact relay error to its HTTP status.
pub fn contact_error_status(error: &ContactError) -> StatusCode {
    match error {
        ContactError::Validation(_) => StatusCode::BAD_REQUEST,
        ContactError::UpstreamAuth(_) => StatusCode::UNAUTHORIZED,
        ContactError::NotConfigured | ContactError::Upstream(_) | ContactError::Transport(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn contact_error_response(error: &ContactError) -> Response {
    let message = match error {
        ContactError::Validation(message) => message.clone(),
        ContactError::NotConfigured => "Server configuration error".to_string(),
        ContactError::UpstreamAuth(hint) => format!("Authentication error. {hint}"),
        ContactError::Upstream(message) => format!("Error: {message}"),
        ContactError::Transport(_) => "Failed to send the message. Please try again.".to_string(),
    };

    (
        contact_error_status(error),
        Json(ContactResponse::failure(&message)),
    )
        .into_response()
}

async fn relay(state: &AppState, payload: &ContactPayload) -> Result<MailReceipt, ContactError> {
    let message = payload.validate()?;
    let Some(mailer) = &state.mailer else {
        error!("Contact form submitted but no email provider is configured");
        return Err(ContactError::NotConfigured);
    };

    mailer.send(&message).await
}

/// Validates a contact form submission and relays it to the email provider.
pub async fn submit_contact(
    State(state): State<AppState>,
    payload: Result<Json<ContactPayload>, JsonRejection>,
) -> Response {
    let outcome = match payload {
        Ok(Json(payload)) => relay(&state, &payload).await,
        Err(rejection) => {
            warn!("Rejected contact submission: {rejection}");
            Err(ContactError::Validation(
                "All fields are required".to_string(),
            ))
        }
    };

    match outcome {
        Ok(receipt) => (
            StatusCode::OK,
            Json(ContactResponse {
                success: true,
                message: SENT_MESSAGE.to_string(),
                message_id: receipt.message_id,
            }),
        )
            .into_response(),
        Err(error) => contact_error_response(&error),
    }
}
