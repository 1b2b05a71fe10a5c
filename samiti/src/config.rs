// SPDX-License-Identifier: MIT OR Apache-2.0

/// Durable key holding the serialized identity of the logged-in member.
pub const DEFAULT_SESSION_KEY: &str = "cm_logged_user";

/// Minimum number of digits of a mobile number (local format, leading zero included).
pub const DEFAULT_MIN_MOBILE_DIGITS: usize = 11;

pub const DEFAULT_MIN_PASSPHRASE_LEN: usize = 4;

#[derive(Clone, Debug)]
pub struct Config {
    pub session_key: String,
    pub min_mobile_digits: usize,
    pub min_passphrase_len: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            session_key: DEFAULT_SESSION_KEY.to_string(),
            min_mobile_digits: DEFAULT_MIN_MOBILE_DIGITS,
            min_passphrase_len: DEFAULT_MIN_PASSPHRASE_LEN,
        }
    }
}
