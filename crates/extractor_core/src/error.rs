use std::fmt;

/// Classification of everything that can go wrong during a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Input rejected before any request was issued.
    Validation,
    /// Non-success HTTP status or network failure while issuing a request.
    Transport,
    /// The response body failed while it was being read.
    Stream,
    /// A single streamed record could not be parsed.
    Decode,
    /// The backend answered with an explicit error status.
    Backend,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Validation => write!(f, "validation error"),
            ErrorKind::Transport => write!(f, "request failed"),
            ErrorKind::Stream => write!(f, "stream error"),
            ErrorKind::Decode => write!(f, "decode error"),
            ErrorKind::Backend => write!(f, "backend error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub kind: ErrorKind,
    pub message: String,
}

impl Failure {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Error(ErrorKind),
}

/// A message the front end must show the user prominently (blocking alert).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}
