use thiserror::Error;

pub type CategorizeResult<T> = Result<T, CategorizeError>;

#[derive(Error, Debug)]
pub enum CategorizeError {
    #[error("section '{key}' is missing field '{field}'")]
    MissingField { key: String, field: String },

    #[error("section '{key}' field '{field}' is not {expected}")]
    InvalidField {
        key: String,
        field: String,
        expected: &'static str,
    },

    #[error("interface '{iface}' references unknown wifi-device '{device}'")]
    DanglingReference { iface: String, device: String },

    #[error("section '{key}' is not a mapping")]
    NotAMapping { key: String },

    #[error("wireless config is not a mapping")]
    InputNotAMapping,

    #[error("unknown interface order '{0}' (expected index, name or input)")]
    UnknownOrder(String),

    #[error("Failed to parse wireless JSON: {0}")]
    Json(#[from] serde_json::Error),
}
