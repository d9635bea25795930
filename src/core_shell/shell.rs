use crate::core_ftp::TransferClient;
use crate::core_session::{
    is_directory_entry, resolve_selection, DownloadOutcome, LoginOutcome, LogoutOutcome, Selection,
    Session,
};
use crate::core_shell::command::{ShellCommand, HELP_TEXT};
use colored::*;
use log::{debug, info};
use std::io;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// What to print once a command has run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Feedback {
    Nothing,
    Status,
    StatusAndListing,
}

/// Line-oriented front end over a `Session`. Holds the only piece of state the
/// session does not: the file picked with `select`.
pub struct Shell<C: TransferClient> {
    session: Session<C>,
    default_server: Option<String>,
    selected_file: Option<String>,
}

impl<C: TransferClient> Shell<C> {
    pub fn new(session: Session<C>, default_server: Option<String>) -> Self {
        Self {
            session,
            default_server,
            selected_file: None,
        }
    }

    #[cfg(test)]
    pub fn session(&self) -> &Session<C> {
        &self.session
    }

    /// Reads commands until `quit` or end of input. The connection is closed
    /// on the way out either way.
    pub async fn run<R, W>(&mut self, input: R, out: &mut W) -> io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = input.lines();
        loop {
            self.write_prompt(out).await?;
            let line = match lines.next_line().await? {
                Some(line) => line,
                None => {
                    debug!("End of input");
                    self.session.disconnect().await;
                    break;
                }
            };

            let flow = match ShellCommand::parse(&line) {
                Ok(command) => self.execute(command, out).await?,
                Err(e) => {
                    write_error(out, &e.to_string()).await?;
                    Flow::Continue
                }
            };
            if flow == Flow::Exit {
                break;
            }
        }
        out.flush().await
    }

    pub async fn execute<W>(&mut self, command: ShellCommand, out: &mut W) -> io::Result<Flow>
    where
        W: AsyncWrite + Unpin,
    {
        let feedback = match command {
            ShellCommand::Empty => Feedback::Nothing,
            ShellCommand::Help => {
                write_line(out, HELP_TEXT).await?;
                Feedback::Nothing
            }
            ShellCommand::Status => {
                self.write_state(out).await?;
                Feedback::Nothing
            }
            ShellCommand::Open(address) => {
                let address = match address.or_else(|| self.default_server.clone()) {
                    Some(address) => address,
                    None => {
                        write_error(out, "No server given and none configured.").await?;
                        return Ok(Flow::Continue);
                    }
                };
                self.session.disconnect().await;
                self.selected_file = None;
                self.session.connect(&address).await;
                Feedback::Status
            }
            ShellCommand::Login { user, password } => {
                if user.trim().is_empty() {
                    write_error(out, "Enter a username.").await?;
                    return Ok(Flow::Continue);
                }
                match self.session.authenticate(&user, &password).await {
                    LoginOutcome::LoggedIn => {
                        info!("Logged in as {}", user);
                        self.selected_file = None;
                        self.session.open_current_directory().await;
                        Feedback::StatusAndListing
                    }
                    _ => Feedback::Status,
                }
            }
            ShellCommand::List => {
                self.session.refresh_listing().await;
                Feedback::StatusAndListing
            }
            ShellCommand::Select(row) => match self.session.listing().select(row) {
                Some(Selection::Parent) => {
                    self.selected_file = None;
                    self.session.enter_parent_directory().await;
                    Feedback::StatusAndListing
                }
                Some(Selection::Directory(name)) => {
                    self.selected_file = None;
                    self.session.enter_directory(&name).await;
                    Feedback::StatusAndListing
                }
                Some(Selection::File(name)) => {
                    write_message(out, &format!("Selected {}", name)).await?;
                    self.selected_file = Some(name);
                    Feedback::Nothing
                }
                None => {
                    write_error(out, &format!("No row {} in the listing.", row)).await?;
                    Feedback::Nothing
                }
            },
            ShellCommand::Cd(name) => {
                self.selected_file = None;
                self.session.enter_directory(&resolve_selection(&name)).await;
                Feedback::StatusAndListing
            }
            ShellCommand::Up => {
                self.selected_file = None;
                self.session.enter_parent_directory().await;
                Feedback::StatusAndListing
            }
            ShellCommand::Put(path) => {
                self.session.upload(&path).await;
                Feedback::StatusAndListing
            }
            ShellCommand::Get(name) => {
                let name = match name.or_else(|| self.selected_file.clone()) {
                    Some(name) => name,
                    None => {
                        write_error(out, "Select a file to download first.").await?;
                        return Ok(Flow::Continue);
                    }
                };
                if self.names_directory(&name) {
                    write_error(out, &format!("{} is a directory.", resolve_selection(&name)))
                        .await?;
                    return Ok(Flow::Continue);
                }
                let name = resolve_selection(&name);
                if let DownloadOutcome::DownloadedOk(path) = self.session.download(&name).await {
                    debug!("Saved {} as {:?}", name, path);
                }
                Feedback::StatusAndListing
            }
            ShellCommand::Mkdir(name) => {
                if name.trim().is_empty() {
                    write_error(out, "Enter a name for the new directory.").await?;
                    return Ok(Flow::Continue);
                }
                self.session.make_directory(&name).await;
                Feedback::StatusAndListing
            }
            ShellCommand::Rm(name) => {
                match name.or_else(|| self.selected_file.take()) {
                    Some(name) => {
                        self.session.delete_file(&name).await;
                    }
                    None => {
                        self.session.delete_current_directory().await;
                    }
                }
                Feedback::StatusAndListing
            }
            ShellCommand::Rmdir => {
                self.selected_file = None;
                self.session.delete_current_directory().await;
                Feedback::StatusAndListing
            }
            ShellCommand::Logout => {
                self.selected_file = None;
                if self.session.logout().await == LogoutOutcome::NotConnected {
                    write_error(out, "Not connected.").await?;
                    return Ok(Flow::Continue);
                }
                Feedback::Status
            }
            ShellCommand::Close => {
                self.selected_file = None;
                if !self.session.is_connected() {
                    write_error(out, "Not connected.").await?;
                    return Ok(Flow::Continue);
                }
                self.session.disconnect().await;
                Feedback::Status
            }
            ShellCommand::Quit => {
                self.session.disconnect().await;
                write_line(out, "Bye.").await?;
                return Ok(Flow::Exit);
            }
        };

        match feedback {
            Feedback::Nothing => {}
            Feedback::Status => self.write_status(out).await?,
            Feedback::StatusAndListing => {
                self.write_status(out).await?;
                self.write_listing(out).await?;
            }
        }
        Ok(Flow::Continue)
    }

    /// True for a `(DIR)` display line or the name of a listed directory.
    fn names_directory(&self, name: &str) -> bool {
        is_directory_entry(name)
            || self
                .session
                .listing()
                .find(name.trim())
                .map_or(false, |entry| entry.is_directory)
    }

    async fn write_prompt<W: AsyncWrite + Unpin>(&self, out: &mut W) -> io::Result<()> {
        let prompt = if self.session.is_authenticated() {
            format!("ftp:{}> ", self.session.current_directory())
        } else {
            "ftp> ".to_string()
        };
        out.write_all(prompt.as_bytes()).await?;
        out.flush().await
    }

    async fn write_status<W: AsyncWrite + Unpin>(&self, out: &mut W) -> io::Result<()> {
        let status = self.session.status();
        if status.has_error() {
            write_error(out, status.error()).await
        } else if !status.message().is_empty() {
            write_message(out, status.message()).await
        } else {
            Ok(())
        }
    }

    async fn write_listing<W: AsyncWrite + Unpin>(&self, out: &mut W) -> io::Result<()> {
        for (row, line) in self.session.listing().display_lines().iter().enumerate() {
            write_line(out, &format!("{:>4}  {}", row, line)).await?;
        }
        Ok(())
    }

    async fn write_state<W: AsyncWrite + Unpin>(&self, out: &mut W) -> io::Result<()> {
        let yes_no = |flag: bool| if flag { "yes" } else { "no" };
        write_line(
            out,
            &format!("Connected: {}", yes_no(self.session.is_connected())),
        )
        .await?;
        write_line(
            out,
            &format!("Logged in: {}", yes_no(self.session.is_authenticated())),
        )
        .await?;
        write_line(
            out,
            &format!("Current directory: {}", self.session.current_directory()),
        )
        .await?;
        if let Some(name) = &self.selected_file {
            let size = self
                .session
                .listing()
                .find(name)
                .and_then(|entry| entry.size)
                .map(|size| format!(" ({} bytes)", size))
                .unwrap_or_default();
            write_line(out, &format!("Selected file: {}{}", name, size)).await?;
        }
        Ok(())
    }
}

async fn write_line<W: AsyncWrite + Unpin>(out: &mut W, line: &str) -> io::Result<()> {
    out.write_all(line.as_bytes()).await?;
    out.write_all(b"\n").await
}

async fn write_message<W: AsyncWrite + Unpin>(out: &mut W, message: &str) -> io::Result<()> {
    write_line(out, &message.green().to_string()).await
}

async fn write_error<W: AsyncWrite + Unpin>(out: &mut W, error: &str) -> io::Result<()> {
    write_line(out, &error.red().to_string()).await
}
