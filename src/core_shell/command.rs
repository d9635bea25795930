use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// Server address; `None` falls back to the configured server.
    Open(Option<String>),
    Login { user: String, password: String },
    List,
    Select(usize),
    Cd(String),
    Up,
    Put(PathBuf),
    Get(Option<String>),
    Mkdir(String),
    Rm(Option<String>),
    Rmdir,
    Logout,
    Close,
    Status,
    Help,
    Quit,
    Empty,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command '{0}', type 'help' for the list of commands")]
    Unknown(String),
    #[error("Usage: {0}")]
    MissingArgument(&'static str),
    #[error("'{0}' is not a row number")]
    InvalidRow(String),
}

pub const HELP_TEXT: &str = "\
open [server]          connect (host, host:port or ftp://host:port)
login <user> [pass]    log in on the open connection
ls                     refresh the listing
select <n>             act on row n of the listing
cd <name>              enter a child directory
up                     go to the parent directory
put <local path>       upload a local file into the current directory
get [name]             download a file (default: the selected one)
mkdir <name>           create a directory
rm [name]              delete a file (default: the selected one, else the current directory)
rmdir                  delete the current directory
logout                 log out, keeping the connection
close                  disconnect
status                 show the connection state
help                   show this text
quit | exit            disconnect and leave";

impl ShellCommand {
    /// Parses one input line. The keyword is case-insensitive; everything
    /// after it is kept verbatim (names may contain spaces).
    pub fn parse(line: &str) -> Result<ShellCommand, CommandError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(ShellCommand::Empty);
        }

        let (keyword, rest) = match line.split_once(char::is_whitespace) {
            Some((keyword, rest)) => (keyword, rest.trim()),
            None => (line, ""),
        };
        let argument = || (!rest.is_empty()).then(|| rest.to_string());

        let command = match keyword.to_ascii_lowercase().as_str() {
            "open" => ShellCommand::Open(argument()),
            "login" | "user" => {
                let (user, password) = match rest.split_once(char::is_whitespace) {
                    Some((user, password)) => (user, password.trim()),
                    None => (rest, ""),
                };
                ShellCommand::Login {
                    user: user.to_string(),
                    password: password.to_string(),
                }
            }
            "ls" | "list" | "dir" => ShellCommand::List,
            "select" => {
                if rest.is_empty() {
                    return Err(CommandError::MissingArgument("select <n>"));
                }
                let row = rest
                    .parse::<usize>()
                    .map_err(|_| CommandError::InvalidRow(rest.to_string()))?;
                ShellCommand::Select(row)
            }
            "cd" => ShellCommand::Cd(argument().ok_or(CommandError::MissingArgument("cd <name>"))?),
            "up" | "cdup" => ShellCommand::Up,
            "put" => ShellCommand::Put(PathBuf::from(
                argument().ok_or(CommandError::MissingArgument("put <local path>"))?,
            )),
            "get" => ShellCommand::Get(argument()),
            // An empty name is rejected by the shell, not here
            "mkdir" => ShellCommand::Mkdir(rest.to_string()),
            "rm" | "delete" => ShellCommand::Rm(argument()),
            "rmdir" => ShellCommand::Rmdir,
            "logout" => ShellCommand::Logout,
            "close" | "disconnect" => ShellCommand::Close,
            "status" => ShellCommand::Status,
            "help" | "?" => ShellCommand::Help,
            "quit" | "exit" | "bye" => ShellCommand::Quit,
            _ => return Err(CommandError::Unknown(keyword.to_string())),
        };
        Ok(command)
    }
}
