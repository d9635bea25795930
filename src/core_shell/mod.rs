// Interactive front end: command parsing and rendering of the session state

pub mod command;
pub mod shell;

pub use command::ShellCommand;
pub use shell::Shell;
