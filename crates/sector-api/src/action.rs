// Panel and lock command enumerations
//
// The service accepts a fixed set of command strings; anything else is
// rejected here, before a request is built, so malformed commands never
// reach the network.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// A panel-wide arming command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArmingAction {
    /// Arm the full site.
    Total,
    /// Arm the perimeter only.
    Partial,
    /// Arm the annex panel.
    ArmAnnex,
    /// Disarm the full site.
    Disarm,
    /// Disarm the annex panel.
    DisarmAnnex,
}

impl ArmingAction {
    /// The wire representation expected by `/Panel/ArmPanel/`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Total => "Total",
            Self::Partial => "Partial",
            Self::ArmAnnex => "ArmAnnex",
            Self::Disarm => "Disarm",
            Self::DisarmAnnex => "DisarmAnnex",
        }
    }
}

impl FromStr for ArmingAction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Total" => Ok(Self::Total),
            "Partial" => Ok(Self::Partial),
            "ArmAnnex" => Ok(Self::ArmAnnex),
            "Disarm" => Ok(Self::Disarm),
            "DisarmAnnex" => Ok(Self::DisarmAnnex),
            other => Err(Error::InvalidCommand {
                command: other.to_owned(),
            }),
        }
    }
}

impl fmt::Display for ArmingAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A command against a single connected lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockAction {
    Lock,
    Unlock,
}

impl LockAction {
    /// The wire representation; doubles as the endpoint path segment
    /// (`/Locks/Lock`, `/Locks/Unlock`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lock => "Lock",
            Self::Unlock => "Unlock",
        }
    }
}

impl FromStr for LockAction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Lock" => Ok(Self::Lock),
            "Unlock" => Ok(Self::Unlock),
            other => Err(Error::InvalidCommand {
                command: other.to_owned(),
            }),
        }
    }
}

impl fmt::Display for LockAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn arming_action_round_trips() {
        for action in [
            ArmingAction::Total,
            ArmingAction::Partial,
            ArmingAction::ArmAnnex,
            ArmingAction::Disarm,
            ArmingAction::DisarmAnnex,
        ] {
            assert_eq!(action.as_str().parse::<ArmingAction>().ok(), Some(action));
        }
    }

    #[test]
    fn unrecognized_action_is_invalid_command() {
        let err = "Totally".parse::<ArmingAction>().unwrap_err();
        assert!(matches!(err, Error::InvalidCommand { command } if command == "Totally"));

        let err = "lock".parse::<LockAction>().unwrap_err();
        assert!(matches!(err, Error::InvalidCommand { .. }));
    }
}
