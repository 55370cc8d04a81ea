/// Failure of a round trip to the task API.
///
/// Transport errors carry no status; non-2xx responses and undecodable
/// bodies carry the HTTP status and the response text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("request failed{}: {body}", status_suffix(.status))]
    RequestFailed { status: Option<u16>, body: String },
}

impl ApiError {
    pub fn transport(err: impl std::fmt::Display) -> Self {
        ApiError::RequestFailed {
            status: None,
            body: err.to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::RequestFailed { status, .. } => *status,
        }
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {s})")).unwrap_or_default()
}
