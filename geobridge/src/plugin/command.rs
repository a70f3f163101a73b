//! Command surface exposed to the scripting caller.

use std::fmt;

/// Actions the plugin handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Single-shot position fix. Takes no arguments.
    GetCurrentPosition,
}

impl Command {
    pub const GET_CURRENT_POSITION: &'static str = "getCurrentPosition";

    /// Resolve an action name. Unrecognised actions are left to the caller.
    pub fn parse(action: &str) -> Option<Self> {
        match action {
            Self::GET_CURRENT_POSITION => Some(Command::GetCurrentPosition),
            _ => None,
        }
    }

    pub fn action(&self) -> &'static str {
        match self {
            Command::GetCurrentPosition => Self::GET_CURRENT_POSITION,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.action())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(
            Command::parse("getCurrentPosition"),
            Some(Command::GetCurrentPosition)
        );
        assert_eq!(Command::parse("watchPosition"), None);
        assert_eq!(Command::parse("GetCurrentPosition"), None);
    }
}
