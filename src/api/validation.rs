use actix_web::HttpResponse;
use serde::Serialize;
use validator::ValidationErrors;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub fields: serde_json::Value,
}

impl ErrorResponse {
    pub fn message(error: &str, message: impl Into<String>) -> Self {
        ErrorResponse {
            error: error.to_string(),
            fields: serde_json::json!({ "message": message.into() }),
        }
    }
}

/// Per-field validation messages as `{"field": {"errors": [...]}}`
pub fn field_errors(validation_errors: &ValidationErrors) -> serde_json::Value {
    let mut fields = serde_json::Map::new();

    for (field, errors) in validation_errors.field_errors() {
        let messages: Vec<String> = errors
            .iter()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Validation error in field: {}", field))
            })
            .collect();
        fields.insert(field.to_string(), serde_json::json!({ "errors": messages }));
    }

    serde_json::Value::Object(fields)
}

/// Creates a configured JsonConfig with standardized error handling for the entire project
pub fn json_config() -> actix_web_validator::JsonConfig {
    actix_web_validator::JsonConfig::default().error_handler(|err, _req| bad_request(err, "Request body"))
}

/// Same error shape for query string extraction
pub fn query_config() -> actix_web_validator::QueryConfig {
    actix_web_validator::QueryConfig::default().error_handler(|err, _req| bad_request(err, "Query string"))
}

/// Same error shape for multipart form extraction
pub fn multipart_config() -> actix_multipart::form::MultipartFormConfig {
    actix_multipart::form::MultipartFormConfig::default().error_handler(|err, _req| {
        let error_response = ErrorResponse::message("Request validation failed", err.to_string());
        actix_web::error::InternalError::from_response(err, HttpResponse::BadRequest().json(error_response)).into()
    })
}

fn bad_request(err: actix_web_validator::Error, source: &str) -> actix_web::Error {
    let error_response = match err {
        actix_web_validator::Error::Validate(validation_errors) => ErrorResponse {
            error: "Validation failed".to_string(),
            fields: field_errors(&validation_errors),
        },
        actix_web_validator::Error::Deserialize(de_err) => {
            let err_string = de_err.to_string();

            let message = if err_string.contains("EOF while parsing") {
                format!("{} is empty. Expected JSON payload", source)
            } else if err_string.contains("invalid digit") {
                format!("{} contains a malformed number", source)
            } else {
                format!("{} has an invalid format", source)
            };

            ErrorResponse::message("Request validation failed", message)
        }
        _ => ErrorResponse::message("Validation failed", "Validation error"),
    };

    actix_web::error::InternalError::from_response("", HttpResponse::BadRequest().json(error_response)).into()
}
