use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

/// Point-in-time presence snapshot for one user.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Presence {
    pub online: bool,
    /// When the user's last connection went away. `None` for users never
    /// seen by this process.
    pub last_seen: Option<DateTime<Utc>>,
}

impl Presence {
    /// Last-seen as Unix seconds, 0 for users never seen.
    pub fn last_seen_unix(&self) -> i64 {
        self.last_seen.map_or(0, |at| at.timestamp())
    }
}

/// Who receives the presence event published on connect and disconnect.
///
/// `ConnectedUser` keeps a user's own devices in sync with each other.
/// `None` suppresses the events entirely; presence then only surfaces
/// through reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceAudience {
    /// Every live connection of the user whose presence changed.
    ConnectedUser,
    /// Nobody.
    None,
}

impl FromStr for PresenceAudience {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "connected-user" => Ok(PresenceAudience::ConnectedUser),
            "none" => Ok(PresenceAudience::None),
            _ => Err(format!("Invalid presence audience: {}", s)),
        }
    }
}

impl fmt::Display for PresenceAudience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PresenceAudience::ConnectedUser => write!(f, "connected-user"),
            PresenceAudience::None => write!(f, "none"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audience_round_trips_through_strings() {
        for audience in [PresenceAudience::ConnectedUser, PresenceAudience::None] {
            assert_eq!(audience.to_string().parse(), Ok(audience));
        }
        assert!("everyone".parse::<PresenceAudience>().is_err());
    }

    #[test]
    fn never_seen_users_read_as_zero() {
        let presence = Presence::default();
        assert!(!presence.online);
        assert_eq!(presence.last_seen_unix(), 0);
    }
}
