use crate::config::ClientConfig;
use crate::constants::{DEFAULT_DOWNLOAD_BUFFER_SIZE, DEFAULT_UPLOAD_BUFFER_SIZE, ROOT_DIRECTORY};
use crate::core_ftp::{FtpError, RemoteEntry, TransferClient};
use crate::core_session::listing::DirectoryListing;
use crate::core_session::outcome::{
    ConnectOutcome, DownloadOutcome, LoginOutcome, LogoutOutcome, OperationOutcome, StatusLine,
};
use crate::core_session::remote_path::{is_root, join_remote};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufReader, BufWriter};

const CONNECTION_LOST: &str = "Lost connection with the server.";
const LOGIN_ERROR: &str = "Error while trying to log in.";
const LIST_ERROR: &str = "Error while collecting the file list.";

/// Local side of the transfers.
#[derive(Debug, Clone)]
pub struct TransferSettings {
    pub download_dir: PathBuf,
    pub upload_buffer_size: usize,
    pub download_buffer_size: usize,
}

impl Default for TransferSettings {
    fn default() -> Self {
        Self {
            download_dir: working_directory(),
            upload_buffer_size: DEFAULT_UPLOAD_BUFFER_SIZE,
            download_buffer_size: DEFAULT_DOWNLOAD_BUFFER_SIZE,
        }
    }
}

impl TransferSettings {
    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            download_dir: config
                .download_dir
                .clone()
                .unwrap_or_else(working_directory),
            upload_buffer_size: config
                .upload_buffer_size
                .unwrap_or(DEFAULT_UPLOAD_BUFFER_SIZE),
            download_buffer_size: config
                .download_buffer_size
                .unwrap_or(DEFAULT_DOWNLOAD_BUFFER_SIZE),
        }
    }
}

fn working_directory() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

/// Owns the protocol connection and keeps the current directory and its
/// listing in step with the server. Every failure ends up on the error
/// channel of `status()`; nothing is propagated to the caller.
///
/// Operations are not reentrant: callers must serialise them.
pub struct Session<C: TransferClient> {
    client: C,
    current_dir: String,
    is_authenticated: bool,
    listing: DirectoryListing,
    status: StatusLine,
    settings: TransferSettings,
}

impl<C: TransferClient> Session<C> {
    pub fn new(client: C, settings: TransferSettings) -> Self {
        Self {
            client,
            current_dir: ROOT_DIRECTORY.to_string(),
            is_authenticated: false,
            listing: DirectoryListing::new(),
            status: StatusLine::default(),
            settings,
        }
    }

    pub fn current_directory(&self) -> &str {
        &self.current_dir
    }

    /// A session whose connection dropped is no longer logged in.
    pub fn is_authenticated(&self) -> bool {
        self.is_authenticated && self.client.is_connected()
    }

    pub fn is_connected(&self) -> bool {
        self.client.is_connected()
    }

    pub fn listing(&self) -> &DirectoryListing {
        &self.listing
    }

    pub fn status(&self) -> &StatusLine {
        &self.status
    }

    #[cfg(test)]
    pub fn client(&self) -> &C {
        &self.client
    }

    #[cfg(test)]
    pub fn client_mut(&mut self) -> &mut C {
        &mut self.client
    }

    /// Single connection attempt, no retry.
    pub async fn connect(&mut self, server_address: &str) -> ConnectOutcome {
        if server_address.trim().is_empty() {
            self.status.set_error("Enter the address of the server.");
            return ConnectOutcome::Unavailable;
        }

        match self.client.connect(server_address).await {
            Ok(()) => {
                info!("Connected to {}", server_address);
                // A new connection starts unauthenticated
                self.is_authenticated = false;
                self.current_dir = ROOT_DIRECTORY.to_string();
                self.listing.clear();
                self.status
                    .set_message(format!("Connected to {}", server_address));
                ConnectOutcome::Connected
            }
            Err(e) => {
                error!("Failed to connect to {}: {}", server_address, e);
                self.status.set_error(format!(
                    "Server unavailable, check the connection: {}",
                    e
                ));
                ConnectOutcome::Unavailable
            }
        }
    }

    /// Passes the credentials through as given; validation belongs to the caller.
    pub async fn authenticate(&mut self, username: &str, password: &str) -> LoginOutcome {
        if !self.client.is_connected() {
            warn!("Login attempted without a connection");
            self.status.set_error(LOGIN_ERROR);
            return LoginOutcome::ProtocolError;
        }

        match self.client.login(username, password).await {
            Ok(true) => {
                self.is_authenticated = true;
                self.current_dir = ROOT_DIRECTORY.to_string();
                self.status.set_message("Login successful!");
                LoginOutcome::LoggedIn
            }
            Ok(false) => {
                self.status.set_error("Invalid username or password.");
                LoginOutcome::InvalidCredentials
            }
            Err(e) => {
                error!("Login failed for {}: {}", username, e);
                self.status.set_error(LOGIN_ERROR);
                LoginOutcome::ProtocolError
            }
        }
    }

    /// Puts a failed protocol call on the error channel. A transport failure
    /// ends the login; a refused or garbled reply leaves the session usable.
    fn report_failure(&mut self, e: &FtpError) -> OperationOutcome {
        if e.is_connection_loss() || !self.client.is_connected() {
            self.is_authenticated = false;
            self.status.set_error(CONNECTION_LOST);
            OperationOutcome::ConnectionLost
        } else {
            self.status.set_error(e.user_message());
            OperationOutcome::Refused
        }
    }

    pub async fn list_current_directory(&mut self) -> Result<Vec<RemoteEntry>, FtpError> {
        if !self.client.is_connected() {
            return Err(FtpError::NotConnected);
        }
        self.client.list_entries().await
    }

    /// Rebuilds the listing. On failure it holds only the root marker.
    async fn rebuild_listing(&mut self) -> Result<(), FtpError> {
        match self.list_current_directory().await {
            Ok(entries) => {
                self.listing = DirectoryListing::from_entries(&entries);
                debug!(
                    "Listing of {} rebuilt with {} entries",
                    self.current_dir,
                    self.listing.len()
                );
                Ok(())
            }
            Err(e) => {
                self.listing = DirectoryListing::from_entries(&[]);
                Err(e)
            }
        }
    }

    pub async fn refresh_listing(&mut self) -> OperationOutcome {
        match self.rebuild_listing().await {
            Ok(()) => OperationOutcome::Completed,
            Err(e) => {
                error!("Failed to list {}: {}", self.current_dir, e);
                let outcome = self.report_failure(&e);
                self.status.set_error(LIST_ERROR);
                outcome
            }
        }
    }

    /// Refresh that follows an operation. A failed operation keeps its own
    /// error on the channel.
    async fn sync_listing(&mut self, operation_failed: bool) {
        if let Err(e) = self.rebuild_listing().await {
            error!("Failed to list {}: {}", self.current_dir, e);
            if !operation_failed {
                self.status.set_error(LIST_ERROR);
            }
        }
    }

    /// Changes into `current_directory()` on the server and refreshes.
    pub async fn open_current_directory(&mut self) -> OperationOutcome {
        let outcome = match self
            .client
            .change_working_directory(&self.current_dir)
            .await
        {
            Ok(true) => {
                info!("Entered {}", self.current_dir);
                self.status
                    .set_message(format!("Current directory: {}", self.current_dir));
                OperationOutcome::Completed
            }
            Ok(false) => {
                warn!("Server refused to enter {}", self.current_dir);
                self.status
                    .set_error(format!("Cannot open directory {}", self.current_dir));
                OperationOutcome::Refused
            }
            Err(e) => {
                error!("Failed to enter {}: {}", self.current_dir, e);
                self.report_failure(&e)
            }
        };

        self.sync_listing(outcome != OperationOutcome::Completed)
            .await;
        outcome
    }

    /// Enters the child directory `name`. The current directory is updated
    /// before the server is asked, and is not rolled back when that fails.
    pub async fn enter_directory(&mut self, name: &str) -> OperationOutcome {
        self.current_dir = join_remote(&self.current_dir, name);
        self.open_current_directory().await
    }

    async fn move_to_parent(&mut self) -> Result<(), FtpError> {
        if !self.client.change_to_parent_directory().await? {
            warn!("Server refused to move up from {}", self.current_dir);
        }
        self.current_dir = self.client.print_working_directory().await?;
        self.client
            .change_working_directory(&self.current_dir)
            .await?;
        Ok(())
    }

    /// At the root only the listing is refreshed.
    pub async fn enter_parent_directory(&mut self) -> OperationOutcome {
        if is_root(&self.current_dir) {
            debug!("Already at the root directory");
            return self.refresh_listing().await;
        }

        let outcome = match self.move_to_parent().await {
            Ok(()) => {
                info!("Moved up to {}", self.current_dir);
                self.status
                    .set_message(format!("Current directory: {}", self.current_dir));
                OperationOutcome::Completed
            }
            Err(e) => {
                error!("Failed to move to the parent directory: {}", e);
                self.report_failure(&e)
            }
        };

        self.sync_listing(outcome != OperationOutcome::Completed)
            .await;
        outcome
    }

    async fn store(
        &mut self,
        remote_path: &str,
        reader: &mut BufReader<File>,
    ) -> Result<bool, FtpError> {
        self.client.set_binary_mode().await?;
        self.client.store_file(remote_path, reader).await
    }

    /// Uploads `local_path` into the current directory under its base name.
    pub async fn upload(&mut self, local_path: &Path) -> OperationOutcome {
        let name = match local_path.file_name().and_then(|name| name.to_str()) {
            Some(name) => name.to_string(),
            None => {
                self.status
                    .set_error(format!("Cannot upload {}", local_path.display()));
                return OperationOutcome::LocalIoFailure;
            }
        };

        let file = match open_regular_file(local_path).await {
            Ok(file) => file,
            Err(e) => {
                error!("Failed to open {:?}: {}", local_path, e);
                self.status.set_error(format!(
                    "Error uploading {} to the server: {}",
                    name, e
                ));
                self.sync_listing(true).await;
                return OperationOutcome::LocalIoFailure;
            }
        };

        let remote_path = join_remote(&self.current_dir, &name);
        let mut reader = BufReader::with_capacity(self.settings.upload_buffer_size, file);
        let outcome = match self.store(&remote_path, &mut reader).await {
            Ok(true) => {
                info!("Uploaded {:?} to {}", local_path, remote_path);
                self.status.set_message(format!("{} uploaded", name));
                OperationOutcome::Completed
            }
            Ok(false) => {
                warn!("Server refused upload of {}", remote_path);
                self.status
                    .set_error(format!("Error uploading {} to the server.", name));
                OperationOutcome::Refused
            }
            Err(e) => {
                error!("Upload of {:?} failed: {}", local_path, e);
                let outcome = self.report_failure(&e);
                self.status.set_error(format!(
                    "Error uploading {} to the server: {}",
                    name,
                    e.user_message()
                ));
                outcome
            }
        };
        // Local file closed here
        drop(reader);

        self.sync_listing(outcome != OperationOutcome::Completed)
            .await;
        outcome
    }

    /// Downloads `remote_file_name` from the current directory into the
    /// download directory. A partial local file is kept on failure.
    pub async fn download(&mut self, remote_file_name: &str) -> DownloadOutcome {
        if !self.client.is_connected() {
            self.status.set_error(CONNECTION_LOST);
            return DownloadOutcome::ConnectionLost;
        }

        let local_name = match Path::new(remote_file_name).file_name() {
            Some(name) => name.to_owned(),
            None => {
                self.status
                    .set_error(format!("Cannot download {}", remote_file_name));
                return DownloadOutcome::LocalIoFailure;
            }
        };
        let local_path = self.settings.download_dir.join(local_name);
        let remote_path = join_remote(&self.current_dir, remote_file_name);

        let outcome = self.retrieve(&remote_path, local_path).await;
        self.sync_listing(!matches!(outcome, DownloadOutcome::DownloadedOk(_)))
            .await;
        outcome
    }

    async fn retrieve(&mut self, remote_path: &str, local_path: PathBuf) -> DownloadOutcome {
        if let Err(e) = self.client.set_binary_mode().await {
            error!("Failed to select binary mode: {}", e);
            return self.download_failure(&e);
        }

        let file = match File::create(&local_path).await {
            Ok(file) => file,
            Err(e) => {
                error!("Failed to create {:?}: {}", local_path, e);
                self.status.set_error(format!(
                    "Cannot write {}: {}",
                    local_path.display(),
                    e
                ));
                return DownloadOutcome::LocalIoFailure;
            }
        };

        let mut writer = BufWriter::with_capacity(self.settings.download_buffer_size, file);
        let transfer = self.client.retrieve_file(remote_path, &mut writer).await;
        let flushed = writer.flush().await;
        // Local file closed here
        drop(writer);

        match (transfer, flushed) {
            (Ok(true), Ok(())) => {
                info!("Downloaded {} to {:?}", remote_path, local_path);
                self.status.set_message(format!(
                    "Download successful: {}",
                    local_path.display()
                ));
                DownloadOutcome::DownloadedOk(local_path)
            }
            (Ok(true), Err(e)) => {
                error!("Failed to flush {:?}: {}", local_path, e);
                self.status.set_error(format!(
                    "Cannot write {}: {}",
                    local_path.display(),
                    e
                ));
                DownloadOutcome::LocalIoFailure
            }
            (Ok(false), flushed) => {
                if let Err(e) = flushed {
                    warn!("Failed to flush {:?}: {}", local_path, e);
                }
                warn!("Download of {} did not complete", remote_path);
                self.status.set_error("Download incomplete.");
                DownloadOutcome::DownloadIncomplete
            }
            (Err(e), flushed) => {
                if let Err(flush_error) = flushed {
                    warn!("Failed to flush {:?}: {}", local_path, flush_error);
                }
                error!("Download of {} failed: {}", remote_path, e);
                self.download_failure(&e)
            }
        }
    }

    fn download_failure(&mut self, e: &FtpError) -> DownloadOutcome {
        match self.report_failure(e) {
            OperationOutcome::ConnectionLost => DownloadOutcome::ConnectionLost,
            _ => DownloadOutcome::DownloadIncomplete,
        }
    }

    pub async fn make_directory(&mut self, name: &str) -> OperationOutcome {
        if name.trim().is_empty() {
            self.status.set_error("Enter a name for the new directory.");
            return OperationOutcome::Refused;
        }

        let path = join_remote(&self.current_dir, name.trim());
        let outcome = match self.client.make_directory(&path).await {
            Ok(true) => {
                info!("Created directory {}", path);
                self.status.set_message("Directory created");
                OperationOutcome::Completed
            }
            Ok(false) => {
                warn!("Server refused to create {}", path);
                self.status.set_error("Failed to create directory");
                OperationOutcome::Refused
            }
            Err(e) => {
                error!("Failed to create {}: {}", path, e);
                self.report_failure(&e)
            }
        };

        self.sync_listing(outcome != OperationOutcome::Completed)
            .await;
        outcome
    }

    async fn remove_working_directory(&mut self) -> Result<(String, bool), FtpError> {
        if !self.client.is_connected() {
            return Err(FtpError::NotConnected);
        }
        let dir_to_delete = self.client.print_working_directory().await?;
        if !is_root(&dir_to_delete) {
            self.move_to_parent().await?;
        }
        let removed = self.client.remove_directory(&dir_to_delete).await?;
        Ok((dir_to_delete, removed))
    }

    /// Deletes the directory the session is currently in, after moving to
    /// its parent.
    pub async fn delete_current_directory(&mut self) -> OperationOutcome {
        let outcome = match self.remove_working_directory().await {
            Ok((dir, true)) => {
                info!("Removed directory {}", dir);
                self.status.set_message("Directory deleted");
                OperationOutcome::Completed
            }
            Ok((dir, false)) => {
                warn!("Server refused to remove {}", dir);
                self.status.set_error("Failed to delete directory");
                OperationOutcome::Refused
            }
            Err(e) => {
                error!("Failed to remove the current directory: {}", e);
                self.report_failure(&e)
            }
        };

        self.sync_listing(outcome != OperationOutcome::Completed)
            .await;
        outcome
    }

    pub async fn delete_file(&mut self, name: &str) -> OperationOutcome {
        let path = join_remote(&self.current_dir, name);
        let outcome = match self.client.delete_file(&path).await {
            Ok(true) => {
                info!("Deleted file {}", path);
                self.status.set_message("File deleted");
                OperationOutcome::Completed
            }
            Ok(false) => {
                warn!("Server refused to delete {}", path);
                self.status.set_error("The file could not be deleted");
                OperationOutcome::Refused
            }
            Err(e) => {
                error!("Failed to delete {}: {}", path, e);
                self.report_failure(&e)
            }
        };

        self.sync_listing(outcome != OperationOutcome::Completed)
            .await;
        outcome
    }

    pub async fn logout(&mut self) -> LogoutOutcome {
        if !self.client.is_connected() {
            debug!("Logout requested without a connection");
            return LogoutOutcome::NotConnected;
        }

        match self.client.logout().await {
            Ok(true) => {
                info!("Logged out");
                self.is_authenticated = false;
                self.listing.clear();
                self.status.set_message("Logged out");
                LogoutOutcome::LoggedOut
            }
            Ok(false) => {
                warn!("Server refused the logout");
                self.status.set_error("Logout refused by the server");
                LogoutOutcome::Refused
            }
            Err(e) => {
                error!("Logout failed: {}", e);
                match self.report_failure(&e) {
                    OperationOutcome::ConnectionLost => {
                        self.listing.clear();
                        LogoutOutcome::ConnectionLost
                    }
                    _ => LogoutOutcome::Refused,
                }
            }
        }
    }

    /// No-op when not connected.
    pub async fn disconnect(&mut self) {
        if !self.client.is_connected() {
            return;
        }

        if let Err(e) = self.client.disconnect().await {
            warn!("Error while disconnecting: {}", e);
        }
        self.is_authenticated = false;
        self.current_dir = ROOT_DIRECTORY.to_string();
        self.listing.clear();
        self.status.set_message("Disconnected");
    }
}

async fn open_regular_file(path: &Path) -> std::io::Result<File> {
    let file = File::open(path).await?;
    if !file.metadata().await?.is_file() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "not a regular file",
        ));
    }
    Ok(file)
}
