use std::fmt;
use std::str::FromStr;

use crate::error::SessionError;

/// Length of every game code.
pub const CODE_LEN: usize = 4;

/// Identifier of a joinable game: exactly four ASCII letters or digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GameCode(String);

impl GameCode {
    /// Validate `raw` as a game code. Case is preserved.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidCode`] unless `raw` is four ASCII
    /// alphanumerics.
    pub fn parse(raw: &str) -> Result<Self, SessionError> {
        if raw.len() == CODE_LEN && raw.bytes().all(|b| b.is_ascii_alphanumeric()) {
            Ok(Self(raw.to_owned()))
        } else {
            Err(SessionError::InvalidCode(raw.to_owned()))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for GameCode {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for GameCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
#[path = "code_test.rs"]
mod tests;
