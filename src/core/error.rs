use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use super::codes::{all_codes, parse_code};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ValidationInvalidArgument,
    ValidationUnexpectedValue,

    NumericOverflow,

    GenericFailure,
    HttpError,
    Custom,

    ConfigInvalidJson,

    InternalIoError,
    InternalJsonError,
    InternalUnexpected,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ValidationInvalidArgument => "validation.invalid_argument",
            ErrorCode::ValidationUnexpectedValue => "validation.unexpected_value",

            ErrorCode::NumericOverflow => "numeric.overflow",

            ErrorCode::GenericFailure => "failure.generic",
            ErrorCode::HttpError => "http.error",
            ErrorCode::Custom => "custom",

            ErrorCode::ConfigInvalidJson => "config.invalid_json",

            ErrorCode::InternalIoError => "internal.io_error",
            ErrorCode::InternalJsonError => "internal.json_error",
            ErrorCode::InternalUnexpected => "internal.unexpected",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hint {
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidArgumentDetails {
    pub field: String,
    pub problem: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tried: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnexpectedValueDetails {
    pub field: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub problem: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverflowDetails {
    pub input: String,
    pub limit: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpErrorDetails {
    pub http_status_code: i64,
    pub user_message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigInvalidJsonDetails {
    pub path: String,
    pub error: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalIoErrorDetails {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalJsonErrorDetails {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

/// Flattened view of an error and its cause chain, suitable for logging or
/// JSON output.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorInfo {
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    pub code: i64,
    pub details: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<Box<ErrorInfo>>,
}

#[derive(Debug, Clone)]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
    pub details: Value,
    pub hints: Vec<Hint>,
    pub retryable: Option<bool>,
    /// Integer code callers can match on (e.g. 1 vs 2 for directory vs file
    /// removal failures). Zero unless set.
    pub numeric_code: i64,
    pub previous: Option<Box<Error>>,
}

pub type Result<T> = std::result::Result<T, Error>;

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.previous
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

fn to_details<T: Serialize>(details: T) -> Value {
    serde_json::to_value(details).unwrap_or_else(|_| Value::Object(serde_json::Map::new()))
}

impl Error {
    pub fn new(code: ErrorCode, message: impl Into<String>, details: Value) -> Self {
        Self {
            code,
            message: message.into(),
            details,
            hints: Vec::new(),
            retryable: None,
            numeric_code: 0,
            previous: None,
        }
    }

    pub fn validation_invalid_argument(
        field: impl Into<String>,
        problem: impl Into<String>,
        id: Option<String>,
        tried: Option<Vec<String>>,
    ) -> Self {
        let problem = problem.into();
        let details = to_details(InvalidArgumentDetails {
            field: field.into(),
            problem: problem.clone(),
            id,
            tried,
        });

        Self::new(ErrorCode::ValidationInvalidArgument, problem, details)
    }

    pub fn validation_unexpected_value(
        field: impl Into<String>,
        value: Option<String>,
        problem: impl Into<String>,
    ) -> Self {
        let problem = problem.into();
        let details = to_details(UnexpectedValueDetails {
            field: field.into(),
            value,
            problem: problem.clone(),
        });

        Self::new(ErrorCode::ValidationUnexpectedValue, problem, details)
    }

    pub fn numeric_overflow(
        input: impl Into<String>,
        limit: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        let details = to_details(OverflowDetails {
            input: input.into(),
            limit: limit.into(),
        });

        Self::new(ErrorCode::NumericOverflow, message, details)
    }

    /// Generic failure carrying only a message.
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::GenericFailure,
            message,
            Value::Object(serde_json::Map::new()),
        )
    }

    /// Error carrying an HTTP status code and a message safe to show to end
    /// users. The user message defaults to `message`.
    pub fn http(
        message: impl Into<String>,
        http_status_code: i64,
        user_message: Option<String>,
    ) -> Self {
        let message = message.into();
        let details = to_details(HttpErrorDetails {
            http_status_code,
            user_message: user_message.unwrap_or_else(|| message.clone()),
        });

        Self::new(ErrorCode::HttpError, message, details)
    }

    /// Error of a caller-registered type. The type identifier is kept in
    /// `details.type`.
    pub fn custom(type_id: impl Into<String>, message: impl Into<String>, details: Value) -> Self {
        let mut details = match details {
            Value::Object(map) => map,
            Value::Null => serde_json::Map::new(),
            other => {
                let mut map = serde_json::Map::new();
                map.insert("value".to_string(), other);
                map
            }
        };
        details.insert("type".to_string(), Value::String(type_id.into()));

        Self::new(ErrorCode::Custom, message, Value::Object(details))
    }

    pub fn config_invalid_json(path: impl Into<String>, err: serde_json::Error) -> Self {
        let details = to_details(ConfigInvalidJsonDetails {
            path: path.into(),
            error: err.to_string(),
        });

        Self::new(
            ErrorCode::ConfigInvalidJson,
            "Invalid JSON in configuration",
            details,
        )
    }

    pub fn internal_io(error: impl Into<String>, context: Option<String>) -> Self {
        let details = to_details(InternalIoErrorDetails {
            error: error.into(),
            context,
        });

        Self::new(ErrorCode::InternalIoError, "IO error", details)
    }

    pub fn internal_json(error: impl Into<String>, context: Option<String>) -> Self {
        let details = to_details(InternalJsonErrorDetails {
            error: error.into(),
            context,
        });

        Self::new(ErrorCode::InternalJsonError, "JSON error", details)
    }

    pub fn internal_unexpected(error: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::InternalUnexpected,
            "Unexpected error",
            serde_json::json!({ "error": error.into() }),
        )
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::internal_unexpected(message)
    }

    pub fn with_hint(mut self, message: impl Into<String>) -> Self {
        self.hints.push(Hint {
            message: message.into(),
        });
        self
    }

    pub fn with_numeric_code(mut self, numeric_code: i64) -> Self {
        self.numeric_code = numeric_code;
        self
    }

    pub fn with_previous(mut self, previous: Error) -> Self {
        self.previous = Some(Box::new(previous));
        self
    }

    /// HTTP status code, present only on `http.error` errors.
    pub fn http_status_code(&self) -> Option<i64> {
        if self.code != ErrorCode::HttpError {
            return None;
        }
        self.details.get("httpStatusCode").and_then(Value::as_i64)
    }

    pub fn user_message(&self) -> Option<&str> {
        if self.code != ErrorCode::HttpError {
            return None;
        }
        self.details.get("userMessage").and_then(Value::as_str)
    }

    /// Type identifier: the registered id for custom errors, the code string
    /// otherwise.
    pub fn type_id(&self) -> &str {
        if self.code == ErrorCode::Custom {
            if let Some(id) = self.details.get("type").and_then(Value::as_str) {
                return id;
            }
        }
        self.code.as_str()
    }

    pub fn info(&self) -> ErrorInfo {
        ErrorInfo {
            kind: self.type_id().to_string(),
            message: self.message.clone(),
            code: self.numeric_code,
            details: self.details.clone(),
            previous: self.previous.as_ref().map(|p| Box::new(p.info())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn invalid_argument_message_is_the_problem() {
        let err = Error::validation_invalid_argument("path", "path is whitespace", None, None);
        assert_eq!(err.code.as_str(), "validation.invalid_argument");
        assert_eq!(err.to_string(), "path is whitespace");
        assert_eq!(err.details["field"], "path");
    }

    #[test]
    fn http_error_defaults_user_message_to_message() {
        let err = Error::http("message", 404, None);
        assert_eq!(err.http_status_code(), Some(404));
        assert_eq!(err.user_message(), Some("message"));

        let err = Error::http("message", 404, Some("a user message".to_string()));
        assert_eq!(err.user_message(), Some("a user message"));
    }

    #[test]
    fn http_accessors_are_none_for_other_codes() {
        let err = Error::failure("boom");
        assert_eq!(err.http_status_code(), None);
        assert_eq!(err.user_message(), None);
    }

    #[test]
    fn previous_is_exposed_as_source() {
        let err = Error::failure("outer").with_previous(Error::failure("inner"));
        assert_eq!(err.source().map(|s| s.to_string()), Some("inner".to_string()));
    }

    #[test]
    fn custom_error_keeps_type_id() {
        let err = Error::custom("billing.declined", "card declined", serde_json::json!({"amount": 5}));
        assert_eq!(err.code, ErrorCode::Custom);
        assert_eq!(err.type_id(), "billing.declined");
        assert_eq!(err.details["amount"], 5);
    }

    #[test]
    fn info_flattens_cause_chain() {
        let err = Error::failure("cannot delete '/tmp/x'")
            .with_numeric_code(2)
            .with_previous(Error::internal_io("permission denied", None));

        let info = err.info();
        assert_eq!(info.kind, "failure.generic");
        assert_eq!(info.code, 2);
        assert_eq!(info.previous.as_ref().map(|p| p.kind.as_str()), Some("internal.io_error"));

        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["type"], "failure.generic");
        assert_eq!(json["message"], "cannot delete '/tmp/x'");
    }
}
