use thiserror::Error;

/// Problems found while reading a payload.
///
/// These are never returned from `canonicalize`; the normalizer substitutes a
/// default and logs the error instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizerError {
    #[error("Malformed input at '{path}': expected {expected}")]
    MalformedInput { path: String, expected: &'static str },

    #[error("Unparsable number: '{0}'")]
    UnparsableNumber(String),
}
