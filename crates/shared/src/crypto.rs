//! API key parsing and hashing.
//!
//! Keys look like `sc_<8 char prefix><secret>`. The prefix is stored in clear
//! for identification; the full key is only ever stored as a sha256 digest.

use sha2::{Digest, Sha256};

pub const API_KEY_SCHEME: &str = "sc_";

const PREFIX_LEN: usize = 8;

/// A key as presented by a caller, structurally checked but not yet authenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresentedKey<'a> {
    raw: &'a str,
}

impl<'a> PresentedKey<'a> {
    /// `None` unless the key carries the scheme and a full identifying prefix.
    pub fn parse(raw: &'a str) -> Option<Self> {
        let rest = raw.strip_prefix(API_KEY_SCHEME)?;
        (rest.len() >= PREFIX_LEN && rest.is_char_boundary(PREFIX_LEN)).then_some(Self { raw })
    }

    /// Identifying characters following the scheme.
    pub fn prefix(&self) -> &'a str {
        &self.raw[API_KEY_SCHEME.len()..API_KEY_SCHEME.len() + PREFIX_LEN]
    }

    /// Lowercase hex sha256 of the full key, as stored in `api_keys.key_hash`.
    pub fn digest(&self) -> String {
        sha256_hex(self.raw)
    }
}

pub fn sha256_hex(input: &str) -> String {
    hex::encode(Sha256::digest(input.as_bytes()))
}
