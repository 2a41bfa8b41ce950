//! Content-addressed names for generated identifiers.
//!
//! Every synthetic name carries the first eight hex digits of the source's
//! MD5 digest, so code translated from different files can be concatenated
//! without labels or scratch variables clashing.

use std::fmt;

/// Which scratch variable of a try/catch site a name is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TempRole {
    /// The boolean status returned by `pcall`
    Status,
    /// The error value returned by `pcall`
    Value,
}

impl TempRole {
    fn stem(self) -> &'static str {
        match self {
            TempRole::Status => "res",
            TempRole::Value => "e",
        }
    }
}

/// Lowercase hexadecimal MD5 digest of a source text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceHash {
    hex: String,
}

impl SourceHash {
    /// Hashes the UTF-8 bytes of `source`.
    pub fn of(source: &str) -> Self {
        Self {
            hex: format!("{:x}", md5::compute(source.as_bytes())),
        }
    }

    /// The full 32-character digest.
    pub fn as_str(&self) -> &str {
        &self.hex
    }

    /// The eight-character namespace prefix.
    pub fn prefix(&self) -> &str {
        &self.hex[..8]
    }

    /// Name of the `n`-th try/catch scratch variable for `role`.
    pub fn temp_name(&self, role: TempRole, n: u32) -> String {
        format!("{}_{}_{}", role.stem(), self.prefix(), n)
    }

    /// Label that `continue` jumps to at loop depth `depth`.
    pub fn continue_label(&self, depth: u32) -> String {
        format!("continue_{}_{}", self.prefix(), depth)
    }
}

impl fmt::Display for SourceHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex)
    }
}
