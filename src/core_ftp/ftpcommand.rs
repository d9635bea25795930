#[derive(Eq, Hash, PartialEq, Debug, Clone, Copy)]
pub enum FtpCommand {
    USER,
    PASS,
    QUIT,
    PWD,
    LIST,
    CWD,
    CDUP,
    MKD,
    RMD,
    DELE,
    RETR,
    STOR,
    PASV,
    TYPE,
}

impl FtpCommand {
    pub fn as_str(&self) -> &'static str {
        match self {
            FtpCommand::USER => "USER",
            FtpCommand::PASS => "PASS",
            FtpCommand::QUIT => "QUIT",
            FtpCommand::PWD => "PWD",
            FtpCommand::LIST => "LIST",
            FtpCommand::CWD => "CWD",
            FtpCommand::CDUP => "CDUP",
            FtpCommand::MKD => "MKD",
            FtpCommand::RMD => "RMD",
            FtpCommand::DELE => "DELE",
            FtpCommand::RETR => "RETR",
            FtpCommand::STOR => "STOR",
            FtpCommand::PASV => "PASV",
            FtpCommand::TYPE => "TYPE",
        }
    }

    /// Formats the command line sent on the control connection.
    pub fn to_line(&self, arg: Option<&str>) -> String {
        match arg {
            Some(arg) => format!("{} {}\r\n", self.as_str(), arg),
            None => format!("{}\r\n", self.as_str()),
        }
    }

    /// The line written to the log. Passwords are masked.
    pub fn to_log_line(&self, arg: Option<&str>) -> String {
        match (self, arg) {
            (FtpCommand::PASS, Some(_)) => "PASS ****".to_string(),
            (_, Some(arg)) => format!("{} {}", self.as_str(), arg),
            (_, None) => self.as_str().to_string(),
        }
    }
}
