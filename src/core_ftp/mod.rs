// FTP client side: the control connection, reply parsing and listings

pub mod address;
pub mod client;
pub mod error;
pub mod ftpcommand;
pub mod list;
pub mod pasv;
pub mod reply;
pub mod transfer_client;

pub use client::FtpClient;
pub use error::FtpError;
pub use list::RemoteEntry;
pub use transfer_client::TransferClient;
