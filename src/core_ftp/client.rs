use crate::core_ftp::address::parse_server_address;
use crate::core_ftp::error::FtpError;
use crate::core_ftp::ftpcommand::FtpCommand;
use crate::core_ftp::list::{parse_listing, RemoteEntry};
use crate::core_ftp::pasv::{parse_pasv_reply, resolve_data_address};
use crate::core_ftp::reply::{parse_quoted_path, read_reply, FtpReply};
use crate::core_ftp::transfer_client::TransferClient;
use log::{debug, error, info, warn};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

/// FTP client over a single control connection. Data transfers use passive mode.
#[derive(Debug)]
pub struct FtpClient {
    control: Option<BufReader<TcpStream>>,
    default_port: u16,
}

impl FtpClient {
    pub fn new(default_port: u16) -> Self {
        Self {
            control: None,
            default_port,
        }
    }

    fn control(&mut self) -> Result<&mut BufReader<TcpStream>, FtpError> {
        self.control.as_mut().ok_or(FtpError::NotConnected)
    }

    /// Reads the next reply. A dead control connection is dropped so that
    /// `is_connected()` reports it.
    async fn read_reply(&mut self) -> Result<FtpReply, FtpError> {
        let control = self.control()?;
        match read_reply(control).await {
            Ok(reply) => {
                debug!("<-- {}", reply);
                Ok(reply)
            }
            Err(e) => {
                if e.is_connection_loss() {
                    error!("Control connection lost: {}", e);
                    self.control = None;
                }
                Err(e)
            }
        }
    }

    /// Sends a command and returns the server's reply.
    async fn send_command(
        &mut self,
        command: FtpCommand,
        arg: Option<&str>,
    ) -> Result<FtpReply, FtpError> {
        let line = command.to_line(arg);
        debug!("--> {}", command.to_log_line(arg));

        let control = self.control()?;
        let written = async {
            let stream = control.get_mut();
            stream.write_all(line.as_bytes()).await?;
            stream.flush().await
        }
        .await;

        if let Err(e) = written {
            error!("Failed to send {}: {}", command.as_str(), e);
            self.control = None;
            return Err(FtpError::Io(e));
        }

        self.read_reply().await
    }

    async fn send_expecting_completion(
        &mut self,
        command: FtpCommand,
        arg: Option<&str>,
    ) -> Result<bool, FtpError> {
        let reply = self.send_command(command, arg).await?;
        if reply.is_positive_completion() {
            Ok(true)
        } else {
            warn!("{} refused: {}", command.as_str(), reply);
            Ok(false)
        }
    }

    /// Issues PASV and connects to the announced data port.
    async fn open_data_connection(&mut self) -> Result<TcpStream, FtpError> {
        let reply = self.send_command(FtpCommand::PASV, None).await?;
        let announced = parse_pasv_reply(&reply)?;
        let peer = self
            .control
            .as_ref()
            .and_then(|control| control.get_ref().peer_addr().ok());
        let addr = resolve_data_address(announced, peer);

        debug!("Opening data connection to {}", addr);
        Ok(TcpStream::connect(addr).await?)
    }
}

impl TransferClient for FtpClient {
    async fn connect(&mut self, address: &str) -> Result<(), FtpError> {
        let target = parse_server_address(address, self.default_port)?;

        if self.control.is_some() {
            self.disconnect().await?;
        }

        info!("Connecting to {}", target);
        let stream = TcpStream::connect(&target).await?;
        self.control = Some(BufReader::new(stream));

        let mut greeting = self.read_reply().await?;
        if greeting.code == 120 {
            // Service ready in a few minutes
            greeting = self.read_reply().await?;
        }
        if !greeting.is_positive_completion() {
            warn!("Server {} rejected the connection: {}", target, greeting);
            self.control = None;
            return Err(FtpError::UnexpectedReply(greeting));
        }

        info!("Connected to {}", target);
        Ok(())
    }

    async fn login(&mut self, username: &str, password: &str) -> Result<bool, FtpError> {
        let mut reply = self.send_command(FtpCommand::USER, Some(username)).await?;
        if reply.is_positive_intermediate() {
            reply = self.send_command(FtpCommand::PASS, Some(password)).await?;
        }

        if reply.is_positive_completion() {
            info!("User {} logged in", username);
            Ok(true)
        } else if reply.is_negative() {
            warn!("Login refused for user {}: {}", username, reply);
            Ok(false)
        } else {
            // e.g. 332, account required
            Err(FtpError::UnexpectedReply(reply))
        }
    }

    fn is_connected(&self) -> bool {
        self.control.is_some()
    }

    async fn list_entries(&mut self) -> Result<Vec<RemoteEntry>, FtpError> {
        let mut data = self.open_data_connection().await?;

        let reply = self.send_command(FtpCommand::LIST, None).await?;
        if !reply.is_preliminary() {
            return Err(FtpError::UnexpectedReply(reply));
        }

        let mut body = Vec::new();
        let received = data.read_to_end(&mut body).await;
        drop(data);

        let done = self.read_reply().await?;
        received?;
        if !done.is_positive_completion() {
            return Err(FtpError::UnexpectedReply(done));
        }

        let entries = parse_listing(&String::from_utf8_lossy(&body));
        debug!("LIST returned {} entries", entries.len());
        Ok(entries)
    }

    async fn logout(&mut self) -> Result<bool, FtpError> {
        self.send_expecting_completion(FtpCommand::QUIT, None).await
    }

    async fn disconnect(&mut self) -> Result<(), FtpError> {
        if let Some(mut control) = self.control.take() {
            if let Err(e) = control.get_mut().shutdown().await {
                debug!("Error shutting down control connection: {}", e);
            }
            info!("Disconnected");
        }
        Ok(())
    }

    async fn print_working_directory(&mut self) -> Result<String, FtpError> {
        let reply = self.send_command(FtpCommand::PWD, None).await?;
        if reply.code != 257 {
            return Err(FtpError::UnexpectedReply(reply));
        }
        parse_quoted_path(&reply)
    }

    async fn change_working_directory(&mut self, path: &str) -> Result<bool, FtpError> {
        self.send_expecting_completion(FtpCommand::CWD, Some(path))
            .await
    }

    async fn change_to_parent_directory(&mut self) -> Result<bool, FtpError> {
        self.send_expecting_completion(FtpCommand::CDUP, None).await
    }

    async fn set_binary_mode(&mut self) -> Result<(), FtpError> {
        let reply = self.send_command(FtpCommand::TYPE, Some("I")).await?;
        if !reply.is_positive_completion() {
            return Err(FtpError::UnexpectedReply(reply));
        }
        Ok(())
    }

    async fn store_file(
        &mut self,
        name: &str,
        source: &mut (dyn AsyncRead + Unpin + Send),
    ) -> Result<bool, FtpError> {
        let mut data = self.open_data_connection().await?;

        let reply = self.send_command(FtpCommand::STOR, Some(name)).await?;
        if !reply.is_preliminary() {
            warn!("STOR {} refused: {}", name, reply);
            return Ok(false);
        }

        let copied = tokio::io::copy(source, &mut data).await;
        if let Err(e) = data.shutdown().await {
            warn!("Error shutting down data stream: {}", e);
        }
        drop(data);

        // Always read the completion reply so the control stream stays in sync.
        let done = self.read_reply().await?;
        let sent = copied?;
        info!("Sent {} bytes for {}: {}", sent, name, done);
        Ok(done.is_positive_completion())
    }

    async fn retrieve_file(
        &mut self,
        path: &str,
        sink: &mut (dyn AsyncWrite + Unpin + Send),
    ) -> Result<bool, FtpError> {
        let mut data = self.open_data_connection().await?;

        let reply = self.send_command(FtpCommand::RETR, Some(path)).await?;
        if !reply.is_preliminary() {
            warn!("RETR {} refused: {}", path, reply);
            return Ok(false);
        }

        let copied = tokio::io::copy(&mut data, sink).await;
        drop(data);

        let done = self.read_reply().await?;
        let received = copied?;
        info!("Received {} bytes for {}: {}", received, path, done);
        Ok(done.is_positive_completion())
    }

    async fn make_directory(&mut self, name: &str) -> Result<bool, FtpError> {
        self.send_expecting_completion(FtpCommand::MKD, Some(name))
            .await
    }

    async fn remove_directory(&mut self, path: &str) -> Result<bool, FtpError> {
        self.send_expecting_completion(FtpCommand::RMD, Some(path))
            .await
    }

    async fn delete_file(&mut self, name: &str) -> Result<bool, FtpError> {
        self.send_expecting_completion(FtpCommand::DELE, Some(name))
            .await
    }
}
