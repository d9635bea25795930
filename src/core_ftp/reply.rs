use crate::core_ftp::error::FtpError;
use std::fmt;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// A complete reply from the server. Multi-line replies are joined with `\n`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FtpReply {
    pub code: u16,
    pub text: String,
}

impl FtpReply {
    pub fn new(code: u16, text: impl Into<String>) -> Self {
        Self {
            code,
            text: text.into(),
        }
    }

    pub fn is_preliminary(&self) -> bool {
        (100..200).contains(&self.code)
    }

    pub fn is_positive_completion(&self) -> bool {
        (200..300).contains(&self.code)
    }

    pub fn is_positive_intermediate(&self) -> bool {
        (300..400).contains(&self.code)
    }

    pub fn is_negative(&self) -> bool {
        self.code >= 400
    }
}

impl fmt::Display for FtpReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code, self.text)
    }
}

/// Splits a status line into its code, a continuation flag (`"220-"`) and the text.
fn split_status_line(line: &str) -> Result<(u16, bool, &str), FtpError> {
    let code = line
        .get(..3)
        .filter(|code| code.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|code| code.parse::<u16>().ok())
        .ok_or_else(|| FtpError::MalformedReply(line.to_string()))?;

    match line.as_bytes().get(3) {
        None => Ok((code, false, "")),
        Some(b' ') => Ok((code, false, &line[4..])),
        Some(b'-') => Ok((code, true, &line[4..])),
        Some(_) => Err(FtpError::MalformedReply(line.to_string())),
    }
}

/// Reads one control line. Servers are free to send paths in any encoding,
/// so invalid UTF-8 is replaced rather than treated as a transport failure.
async fn read_line<R: AsyncBufRead + Unpin>(reader: &mut R) -> Result<String, FtpError> {
    let mut buffer = Vec::new();
    let n = reader.read_until(b'\n', &mut buffer).await?;
    if n == 0 {
        return Err(FtpError::ConnectionClosed);
    }
    let line = String::from_utf8_lossy(&buffer);
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Reads one full reply from the control connection.
pub async fn read_reply<R: AsyncBufRead + Unpin>(reader: &mut R) -> Result<FtpReply, FtpError> {
    let first = read_line(reader).await?;
    let (code, continued, text) = split_status_line(&first)?;
    let mut reply = FtpReply::new(code, text);

    if continued {
        let code_str = code.to_string();
        let terminator = format!("{} ", code_str);
        loop {
            let line = read_line(reader).await?;
            reply.text.push('\n');
            if line.starts_with(&terminator) {
                reply.text.push_str(&line[4..]);
                break;
            }
            if line == code_str {
                break;
            }
            // Intermediate lines may or may not repeat the code with a dash.
            let body = line
                .strip_prefix(&format!("{}-", code_str))
                .unwrap_or(line.trim_start());
            reply.text.push_str(body);
        }
    }

    Ok(reply)
}

/// Extracts the directory from a 257 reply such as `257 "/pub" is the current directory`.
pub fn parse_quoted_path(reply: &FtpReply) -> Result<String, FtpError> {
    let text = reply.text.as_str();
    let start = text
        .find('"')
        .ok_or_else(|| FtpError::MalformedReply(reply.to_string()))?;

    let mut path = String::new();
    let mut chars = text[start + 1..].chars().peekable();
    while let Some(c) = chars.next() {
        if c == '"' {
            // A doubled quote is an escaped quote inside the path.
            if chars.peek() == Some(&'"') {
                chars.next();
                path.push('"');
            } else {
                return Ok(path);
            }
        } else {
            path.push(c);
        }
    }

    Err(FtpError::MalformedReply(reply.to_string()))
}
