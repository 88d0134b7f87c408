use serde::Serialize;

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

pub fn error_response(message: &str) -> ErrorResponse {
    ErrorResponse {
        error: message.to_string(),
    }
}

pub fn message_response(message: &str) -> MessageResponse {
    MessageResponse {
        message: message.to_string(),
    }
}
