// Error handling for the FTP client module
use crate::core_ftp::reply::FtpReply;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FtpError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not connected to a server")]
    NotConnected,

    #[error("Connection closed by the server")]
    ConnectionClosed,

    #[error("Malformed server reply: {0}")]
    MalformedReply(String),

    #[error("Unexpected server reply: {0}")]
    UnexpectedReply(FtpReply),

    #[error("Invalid server address: {0}")]
    InvalidAddress(String),
}

impl FtpError {
    /// True when the control connection can no longer be used.
    pub fn is_connection_loss(&self) -> bool {
        matches!(
            self,
            FtpError::Io(_) | FtpError::NotConnected | FtpError::ConnectionClosed
        )
    }

    pub fn user_message(&self) -> String {
        match self {
            FtpError::NotConnected => "Not connected to the server.".to_string(),
            FtpError::ConnectionClosed | FtpError::Io(_) => {
                "Lost connection with the server.".to_string()
            }
            FtpError::InvalidAddress(address) => format!("Invalid server address: {}", address),
            FtpError::MalformedReply(_) | FtpError::UnexpectedReply(_) => {
                "The server sent an unexpected reply.".to_string()
            }
        }
    }
}
