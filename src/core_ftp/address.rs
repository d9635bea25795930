use crate::constants::IP_HOSTNAME_MAX_LENGTH;
use crate::core_ftp::error::FtpError;
use url::Url;

/// Turns what the user typed (`host`, `host:port`, `[v6]:port` or an
/// `ftp://` URL) into a `host:port` string for `TcpStream::connect`.
pub fn parse_server_address(input: &str, default_port: u16) -> Result<String, FtpError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(FtpError::InvalidAddress("empty address".to_string()));
    }
    if input.len() > IP_HOSTNAME_MAX_LENGTH || input.chars().any(char::is_whitespace) {
        return Err(FtpError::InvalidAddress(input.to_string()));
    }

    if input.contains("://") {
        let url =
            Url::parse(input).map_err(|e| FtpError::InvalidAddress(format!("{}: {}", input, e)))?;
        if url.scheme() != "ftp" {
            return Err(FtpError::InvalidAddress(format!(
                "{}: unsupported scheme {}",
                input,
                url.scheme()
            )));
        }
        let host = url
            .host_str()
            .ok_or_else(|| FtpError::InvalidAddress(input.to_string()))?;
        return Ok(format!("{}:{}", host, url.port().unwrap_or(default_port)));
    }

    // Bracketed IPv6 literal, with or without a port
    if input.starts_with('[') {
        let end = input
            .find(']')
            .ok_or_else(|| FtpError::InvalidAddress(input.to_string()))?;
        let host = &input[..=end];
        return match &input[end + 1..] {
            "" => Ok(format!("{}:{}", host, default_port)),
            rest => {
                let port = rest
                    .strip_prefix(':')
                    .and_then(|port| port.parse::<u16>().ok())
                    .ok_or_else(|| FtpError::InvalidAddress(input.to_string()))?;
                Ok(format!("{}:{}", host, port))
            }
        };
    }

    match input.matches(':').count() {
        0 => Ok(format!("{}:{}", input, default_port)),
        1 => {
            let (host, port) = input
                .split_once(':')
                .ok_or_else(|| FtpError::InvalidAddress(input.to_string()))?;
            let port = port
                .parse::<u16>()
                .map_err(|_| FtpError::InvalidAddress(input.to_string()))?;
            if host.is_empty() {
                return Err(FtpError::InvalidAddress(input.to_string()));
            }
            Ok(format!("{}:{}", host, port))
        }
        // Bare IPv6 literal
        _ => Ok(format!("[{}]:{}", input, default_port)),
    }
}
