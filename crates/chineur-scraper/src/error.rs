use thiserror::Error;

use crate::render::RenderError;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("invalid search request: {reason}")]
    InvalidRequest { reason: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("rendering failed: {0}")]
    Render(#[from] RenderError),
}
