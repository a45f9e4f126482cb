use crate::article::ArticleResponse;
use crate::extract::ModelPayload;

/// Turns a parsed model reply into the response handed to the channels.
pub fn classify(payload: ModelPayload) -> ArticleResponse {
    if payload.error {
        ArticleResponse::failure(payload.error_message)
    } else {
        ArticleResponse::success(payload.data)
    }
}
