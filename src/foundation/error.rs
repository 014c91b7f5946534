pub type BannerResult<T> = Result<T, BannerError>;

#[derive(thiserror::Error, Debug)]
pub enum BannerError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("request error for '{url}': {message}")]
    Request { url: String, message: String },

    #[error("unexpected content type '{content_type}' for '{url}'; response starts with: {snippet:?}")]
    ContentType {
        url: String,
        content_type: String,
        snippet: String,
    },

    #[error("decode error: {0}")]
    Decode(String),

    #[error("no badges could be fetched")]
    NoBadges,

    #[error("encode error: {0}")]
    Encode(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BannerError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn request(url: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Request {
            url: url.into(),
            message: msg.into(),
        }
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }
}
