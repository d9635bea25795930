// src/constants.rs

pub const ROOT_DIRECTORY: &str = "/";
pub const DIR_TAG: &str = "(DIR) ";
pub const DEFAULT_FTP_PORT: u16 = 21;
pub const IP_HOSTNAME_MAX_LENGTH: usize = 128;
pub const DEFAULT_UPLOAD_BUFFER_SIZE: usize = 256 * 1024;
pub const DEFAULT_DOWNLOAD_BUFFER_SIZE: usize = 128 * 1024;
