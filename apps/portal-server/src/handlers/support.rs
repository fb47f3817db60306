//! Support (SAC) mail relay.

use actix_multipart::{Multipart, MultipartError};
use actix_web::{HttpResponse, web};
use futures::StreamExt;
use portal_core::domain::{Attachment, SupportTicket};
use portal_shared::dto::SupportReply;

use crate::observability::RequestId;
use crate::state::AppState;

const REFERENCE_FIELD: &str = "nota";
const NOTES_FIELD: &str = "observacoes";
const FILES_FIELD: &str = "anexos";
const DEFAULT_FILE_CONTENT_TYPE: &str = "application/octet-stream";

pub const SENT_MESSAGE: &str = "Email enviado com sucesso";
pub const SEND_FAILED: &str = "Erro ao enviar email";
pub const UPLOAD_FAILED: &str = "Erro no upload de arquivos";
pub const METHOD_NOT_ALLOWED: &str = "Método não permitido";

#[derive(Debug)]
enum UploadError {
    Multipart(MultipartError),
    TooLarge { limit: usize },
    /// A text field that is not valid UTF-8.
    Encoding(&'static str),
}

impl From<MultipartError> for UploadError {
    fn from(err: MultipartError) -> Self {
        UploadError::Multipart(err)
    }
}

impl std::fmt::Display for UploadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UploadError::Multipart(e) => write!(f, "{e}"),
            UploadError::TooLarge { limit } => write!(f, "upload exceeds {limit} bytes"),
            UploadError::Encoding(field) => write!(f, "field {field} is not UTF-8"),
        }
    }
}

/// Collect the form into a ticket. Unknown fields are drained and ignored;
/// file parts without a file name are skipped.
async fn read_ticket(mut payload: Multipart, limit: usize) -> Result<SupportTicket, UploadError> {
    let mut ticket = SupportTicket::default();
    let mut total = 0usize;

    while let Some(field) = payload.next().await {
        let mut field = field?;
        let name = field.name().unwrap_or_default().to_string();
        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string);
        let content_type = field
            .content_type()
            .map(|mime| mime.essence_str().to_string())
            .unwrap_or_else(|| DEFAULT_FILE_CONTENT_TYPE.to_string());

        let mut content = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk?;
            total += chunk.len();
            if total > limit {
                return Err(UploadError::TooLarge { limit });
            }
            content.extend_from_slice(&chunk);
        }

        match name.as_str() {
            REFERENCE_FIELD => {
                ticket.reference = String::from_utf8(content)
                    .map_err(|_| UploadError::Encoding(REFERENCE_FIELD))?
                    .trim()
                    .to_string();
            }
            NOTES_FIELD => {
                ticket.notes =
                    String::from_utf8(content).map_err(|_| UploadError::Encoding(NOTES_FIELD))?;
            }
            FILES_FIELD => match filename.filter(|f| !f.is_empty()) {
                Some(filename) => ticket.attachments.push(Attachment {
                    filename,
                    content_type,
                    content,
                }),
                None => tracing::debug!("Skipping file part without a file name"),
            },
            other => tracing::debug!(field = %other, "Ignoring unknown form field"),
        }
    }

    Ok(ticket)
}

/// POST /api/enviar-solicitacao-sac
///
/// Multipart form: `nota`, `observacoes` and any number of `anexos` files.
pub async fn send_support_request(
    state: web::Data<AppState>,
    request_id: RequestId,
    payload: Multipart,
) -> HttpResponse {
    let ticket = match read_ticket(payload, state.max_upload_bytes).await {
        Ok(ticket) => ticket,
        Err(e) => {
            tracing::error!(request_id = %request_id.as_str(), error = %e, "Erro no upload");
            return HttpResponse::InternalServerError().json(SupportReply::error(UPLOAD_FAILED));
        }
    };

    match state.mailer.send_ticket(&ticket).await {
        Ok(()) => {
            tracing::info!(
                request_id = %request_id.as_str(),
                reference = %ticket.reference,
                attachments = ticket.attachments.len(),
                "Support request relayed"
            );
            HttpResponse::Ok().json(SupportReply::message(SENT_MESSAGE))
        }
        Err(e) => {
            tracing::error!(request_id = %request_id.as_str(), error = %e, "Erro ao enviar email");
            HttpResponse::InternalServerError().json(SupportReply::error(SEND_FAILED))
        }
    }
}

/// Any other method on the support route.
pub async fn method_not_allowed() -> HttpResponse {
    HttpResponse::MethodNotAllowed().json(SupportReply::error(METHOD_NOT_ALLOWED))
}
