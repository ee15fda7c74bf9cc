#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ContentError {
    #[error("Invalid content prefix")]
    InvalidPrefix,
    #[error("Unsupported content data format: 0x{0:02x}")]
    UnsupportedContentFormat(u8),
    #[error("Malformed snake chain: {0}")]
    MalformedChain(&'static str),
    #[error("Too many dictionary entries")]
    TooManyFields,
}
