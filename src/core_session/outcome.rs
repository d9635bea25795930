use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectOutcome {
    Connected,
    Unavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    LoggedIn,
    InvalidCredentials,
    ProtocolError,
}

/// Result of navigation, upload, mkdir, rmdir and delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationOutcome {
    Completed,
    /// The server answered but refused the request.
    Refused,
    ConnectionLost,
    LocalIoFailure,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    DownloadedOk(PathBuf),
    DownloadIncomplete,
    ConnectionLost,
    LocalIoFailure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutOutcome {
    LoggedOut,
    Refused,
    /// Nothing to do: there was no connection.
    NotConnected,
    ConnectionLost,
}

/// The two text channels shown to the user. Setting one clears the other.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusLine {
    message: String,
    error: String,
}

impl StatusLine {
    pub fn set_message(&mut self, message: impl Into<String>) {
        self.error.clear();
        self.message = message.into();
    }

    pub fn set_error(&mut self, error: impl Into<String>) {
        self.message.clear();
        self.error = error.into();
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn error(&self) -> &str {
        &self.error
    }

    pub fn has_error(&self) -> bool {
        !self.error.is_empty()
    }
}
