//! OAuth scopes.

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

use crate::error::AuthError;

const SCOPE_URLS: [&str; 5] = [
    "https://www.googleapis.com/auth/yt-analytics.readonly",
    "https://www.googleapis.com/auth/yt-analytics-monetary.readonly",
    "openid",
    "https://www.googleapis.com/auth/userinfo.profile",
    "https://www.googleapis.com/auth/userinfo.email",
];

/// A set of API scopes. Combine with `|`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Scopes(u8);

impl Scopes {
    /// Reports without revenue data.
    pub const READONLY: Scopes = Scopes(1 << 0);
    /// Revenue data only.
    pub const MONETARY_READONLY: Scopes = Scopes(1 << 1);
    pub const ALL_READONLY: Scopes = Scopes(Self::READONLY.0 | Self::MONETARY_READONLY.0);
    pub const OPENID: Scopes = Scopes(1 << 2);
    pub const PROFILE: Scopes = Scopes(1 << 3);
    pub const EMAIL: Scopes = Scopes(1 << 4);
    pub const ALL_JWT: Scopes = Scopes(Self::OPENID.0 | Self::PROFILE.0 | Self::EMAIL.0);
    pub const ALL: Scopes = Scopes(Self::ALL_READONLY.0 | Self::ALL_JWT.0);

    pub const fn empty() -> Self {
        Scopes(0)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, other: Scopes) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn intersects(self, other: Scopes) -> bool {
        self.0 & other.0 != 0
    }

    /// Scope URLs joined by spaces, as sent in an authorisation request.
    pub fn formatted(self) -> String {
        SCOPE_URLS
            .iter()
            .enumerate()
            .filter(|(i, _)| self.0 & (1 << i) != 0)
            .map(|(_, url)| *url)
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn from_name(name: &str) -> Option<Scopes> {
        let scopes = match name.to_ascii_lowercase().as_str() {
            "readonly" => Self::READONLY,
            "monetary_readonly" => Self::MONETARY_READONLY,
            "all_readonly" => Self::ALL_READONLY,
            "openid" => Self::OPENID,
            "profile" => Self::PROFILE,
            "email" => Self::EMAIL,
            "all_jwt" => Self::ALL_JWT,
            "all" => Self::ALL,
            _ => return None,
        };
        Some(scopes)
    }

    pub fn from_names<I, S>(names: I) -> Result<Scopes, AuthError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names.into_iter().try_fold(Scopes::empty(), |acc, name| {
            let name = name.as_ref();
            Scopes::from_name(name)
                .map(|scope| acc | scope)
                .ok_or_else(|| AuthError::InvalidScopes(format!("unknown scope '{}'", name)))
        })
    }

    /// Reports need at least one of the two analytics scopes.
    pub fn validate(self) -> Result<(), AuthError> {
        if self.intersects(Self::ALL_READONLY) {
            Ok(())
        } else {
            Err(AuthError::InvalidScopes(
                "the READONLY or MONETARY_READONLY scope must be provided".to_string(),
            ))
        }
    }
}

impl BitOr for Scopes {
    type Output = Scopes;

    fn bitor(self, rhs: Scopes) -> Scopes {
        Scopes(self.0 | rhs.0)
    }
}

impl BitOrAssign for Scopes {
    fn bitor_assign(&mut self, rhs: Scopes) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Scopes {
    type Output = Scopes;

    fn bitand(self, rhs: Scopes) -> Scopes {
        Scopes(self.0 & rhs.0)
    }
}

impl fmt::Debug for Scopes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [&str; 5] = ["READONLY", "MONETARY_READONLY", "OPENID", "PROFILE", "EMAIL"];
        let names: Vec<_> = NAMES
            .iter()
            .enumerate()
            .filter(|(i, _)| self.0 & (1 << i) != 0)
            .map(|(_, name)| *name)
            .collect();
        write!(f, "Scopes({})", names.join(" | "))
    }
}
