pub type PackshotResult<T> = Result<T, PackshotError>;

#[derive(thiserror::Error, Debug)]
pub enum PackshotError {
    #[error("config error: {0}")]
    Config(String),

    #[error("fetch error: {url}: {reason}")]
    Fetch {
        url: String,
        status: Option<u16>,
        reason: String,
    },

    #[error("decode error: {0}")]
    Decode(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PackshotError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Fetch failure carrying an HTTP status code.
    pub fn fetch_status(url: impl Into<String>, status: u16) -> Self {
        Self::Fetch {
            url: url.into(),
            status: Some(status),
            reason: format!("status {status}"),
        }
    }

    /// Fetch failure below the HTTP layer (DNS, timeout, connection reset).
    pub fn fetch_transport(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Fetch {
            url: url.into(),
            status: None,
            reason: reason.into(),
        }
    }

    /// True for the expected "remote image does not exist" case, which the
    /// pipelines treat as a quiet per-item skip.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::Fetch {
                status: Some(404),
                ..
            }
        )
    }
}
