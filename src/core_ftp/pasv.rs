use crate::core_ftp::error::FtpError;
use crate::core_ftp::reply::FtpReply;
use log::debug;
use regex::Regex;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::OnceLock;

fn pasv_regex() -> Option<&'static Regex> {
    static PASV: OnceLock<Option<Regex>> = OnceLock::new();
    PASV.get_or_init(|| {
        Regex::new(r"(\d{1,3}),(\d{1,3}),(\d{1,3}),(\d{1,3}),(\d{1,3}),(\d{1,3})").ok()
    })
    .as_ref()
}

/// Parses a `227 Entering Passive Mode (h1,h2,h3,h4,p1,p2)` reply.
pub fn parse_pasv_reply(reply: &FtpReply) -> Result<SocketAddr, FtpError> {
    if reply.code != 227 {
        return Err(FtpError::UnexpectedReply(reply.clone()));
    }

    let captures = pasv_regex()
        .and_then(|regex| regex.captures(&reply.text))
        .ok_or_else(|| FtpError::MalformedReply(reply.to_string()))?;

    // Validate every field as a byte
    let mut fields = [0u8; 6];
    for (i, field) in fields.iter_mut().enumerate() {
        *field = captures[i + 1]
            .parse::<u8>()
            .map_err(|_| FtpError::MalformedReply(reply.to_string()))?;
    }

    let ip = Ipv4Addr::new(fields[0], fields[1], fields[2], fields[3]);
    let port = (fields[4] as u16) << 8 | fields[5] as u16;
    debug!("PASV data address: {}:{}", ip, port);

    Ok(SocketAddr::new(IpAddr::V4(ip), port))
}

/// Servers behind NAT sometimes announce `0.0.0.0`; fall back to the control peer.
pub fn resolve_data_address(announced: SocketAddr, control_peer: Option<SocketAddr>) -> SocketAddr {
    match control_peer {
        Some(peer) if announced.ip().is_unspecified() => SocketAddr::new(peer.ip(), announced.port()),
        _ => announced,
    }
}
