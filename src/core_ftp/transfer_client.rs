use crate::core_ftp::error::FtpError;
use crate::core_ftp::list::RemoteEntry;
use tokio::io::{AsyncRead, AsyncWrite};

/// The protocol operations the session layer relies on.
///
/// `Ok(false)` means the server refused the request; `Err` means the transport
/// failed. Binary mode must be selected before every transfer.
#[allow(async_fn_in_trait)]
pub trait TransferClient {
    async fn connect(&mut self, address: &str) -> Result<(), FtpError>;

    async fn login(&mut self, username: &str, password: &str) -> Result<bool, FtpError>;

    fn is_connected(&self) -> bool;

    async fn list_entries(&mut self) -> Result<Vec<RemoteEntry>, FtpError>;

    async fn logout(&mut self) -> Result<bool, FtpError>;

    async fn disconnect(&mut self) -> Result<(), FtpError>;

    async fn print_working_directory(&mut self) -> Result<String, FtpError>;

    async fn change_working_directory(&mut self, path: &str) -> Result<bool, FtpError>;

    async fn change_to_parent_directory(&mut self) -> Result<bool, FtpError>;

    async fn set_binary_mode(&mut self) -> Result<(), FtpError>;

    async fn store_file(
        &mut self,
        name: &str,
        source: &mut (dyn AsyncRead + Unpin + Send),
    ) -> Result<bool, FtpError>;

    async fn retrieve_file(
        &mut self,
        path: &str,
        sink: &mut (dyn AsyncWrite + Unpin + Send),
    ) -> Result<bool, FtpError>;

    async fn make_directory(&mut self, name: &str) -> Result<bool, FtpError>;

    async fn remove_directory(&mut self, path: &str) -> Result<bool, FtpError>;

    async fn delete_file(&mut self, name: &str) -> Result<bool, FtpError>;
}
