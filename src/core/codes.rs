use super::error::ErrorCode;

pub fn all_codes() -> &'static [ErrorCode] {
    &[
        ErrorCode::ValidationInvalidArgument,
        ErrorCode::ValidationUnexpectedValue,
        ErrorCode::NumericOverflow,
        ErrorCode::GenericFailure,
        ErrorCode::HttpError,
        ErrorCode::Custom,
        ErrorCode::ConfigInvalidJson,
        ErrorCode::InternalIoError,
        ErrorCode::InternalJsonError,
        ErrorCode::InternalUnexpected,
    ]
}

pub fn parse_code(code: &str) -> Option<ErrorCode> {
    all_codes()
        .iter()
        .copied()
        .find(|candidate| candidate.as_str() == code)
}
