use crate::algorithm::AlgorithmType;
use miniserde::{Deserialize, Serialize};

/// JWT header structure
///
/// Represents the JOSE header containing algorithm and token type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct TokenHeader {
    /// Algorithm used for signing
    #[serde(rename = "alg")]
    pub algorithm: String,

    /// Token type (typically "JWT")
    #[serde(rename = "typ")]
    pub token_type: Option<String>,
}

impl TokenHeader {
    /// Header written on issuance
    pub(crate) fn for_algorithm(algorithm: AlgorithmType) -> Self {
        Self {
            algorithm: algorithm.as_str().to_string(),
            token_type: Some("JWT".to_string()),
        }
    }
}
