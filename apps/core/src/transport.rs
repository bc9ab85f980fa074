use std::io::{BufRead, Write};

use serde::{Deserialize, Serialize};

use crate::contract::{CoreRequest, CoreResponse};
use crate::core_service::{ServiceError, VessloService};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidJson,
    InvalidRequest,
    DataUnavailable,
    AppNotFound,
    Launch,
    Config,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub code: ErrorCode,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TransportResponse {
    Ok { response: CoreResponse },
    Err { error: ErrorResponse },
}

pub fn handle_request(service: &VessloService, request: CoreRequest) -> TransportResponse {
    match service.handle_command(request) {
        Ok(response) => TransportResponse::Ok { response },
        Err(error) => TransportResponse::Err {
            error: map_service_error(error),
        },
    }
}

pub fn handle_json(service: &VessloService, payload: &str) -> String {
    let response = match serde_json::from_str::<CoreRequest>(payload) {
        Ok(request) => handle_request(service, request),
        Err(error) => TransportResponse::Err {
            error: ErrorResponse {
                code: ErrorCode::InvalidJson,
                message: error.to_string(),
            },
        },
    };

    encode(&response)
}

/// Answers one JSON request per input line until EOF. Blank lines are skipped;
/// a line that is not UTF-8 gets an `invalid_json` reply.
pub fn serve<R: BufRead, W: Write>(
    service: &VessloService,
    input: R,
    mut output: W,
) -> std::io::Result<usize> {
    let mut handled = 0;
    for line in input.split(b'\n') {
        let line = line?;
        let reply = match std::str::from_utf8(&line) {
            Ok(text) if text.trim().is_empty() => continue,
            Ok(text) => handle_json(service, text),
            Err(error) => encode(&TransportResponse::Err {
                error: ErrorResponse {
                    code: ErrorCode::InvalidJson,
                    message: format!("request is not valid UTF-8: {error}"),
                },
            }),
        };
        writeln!(output, "{reply}")?;
        output.flush()?;
        handled += 1;
    }
    tracing::debug!(handled, "transport input closed");
    Ok(handled)
}

pub fn encode(response: &TransportResponse) -> String {
    serde_json::to_string(response).unwrap_or_else(|error| {
        format!(
            r#"{{"status":"err","error":{{"code":"invalid_json","message":{}}}}}"#,
            serde_json::Value::String(error.to_string())
        )
    })
}

pub fn map_service_error(error: ServiceError) -> ErrorResponse {
    let code = match &error {
        ServiceError::InvalidRequest(_) => ErrorCode::InvalidRequest,
        ServiceError::DataUnavailable(_) => ErrorCode::DataUnavailable,
        ServiceError::AppNotFound(_) => ErrorCode::AppNotFound,
        ServiceError::Launch(_) => ErrorCode::Launch,
        ServiceError::Config(_) => ErrorCode::Config,
    };
    ErrorResponse {
        code,
        message: error.to_string(),
    }
}
