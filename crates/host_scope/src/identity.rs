//! Browser identities: the `(family, release)` key every capability resolves against.
//!
//! Identities are small `Copy` values. They are parsed from the same compact
//! tokens the descriptor configuration uses (`chrome`, `ff-esr:115`, `ie:11`).

use core::fmt::{Display, Formatter, Result as FmtResult};
use core::str::FromStr;

use crate::error::ConfigurationError;

/// The closed set of emulated browser families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BrowserFamily {
    Chrome,
    Edge,
    Firefox,
    FirefoxEsr,
    InternetExplorer,
}

impl BrowserFamily {
    /// Every family, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Chrome,
        Self::Edge,
        Self::Firefox,
        Self::FirefoxEsr,
        Self::InternetExplorer,
    ];

    /// Canonical configuration token for this family.
    #[inline]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Chrome => "chrome",
            Self::Edge => "edge",
            Self::Firefox => "ff",
            Self::FirefoxEsr => "ff-esr",
            Self::InternetExplorer => "ie",
        }
    }

    /// Parse a family token. Accepts the canonical tokens plus a few long-hand spellings.
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "chrome" => Some(Self::Chrome),
            "edge" => Some(Self::Edge),
            "ff" | "firefox" => Some(Self::Firefox),
            "ff-esr" | "ff_esr" | "firefox-esr" | "firefoxesr" => Some(Self::FirefoxEsr),
            "ie" | "internet-explorer" | "internetexplorer" => Some(Self::InternetExplorer),
            _ => None,
        }
    }
}

impl Display for BrowserFamily {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FmtResult {
        formatter.write_str(self.token())
    }
}

/// Release track within a family. `Current` orders after every numbered release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ReleaseTrack {
    /// A numbered major release.
    Version(u32),
    /// The latest release of the family.
    Current,
}

impl Display for ReleaseTrack {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Version(number) => write!(formatter, "{number}"),
            Self::Current => formatter.write_str("current"),
        }
    }
}

impl FromStr for ReleaseTrack {
    type Err = ConfigurationError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let trimmed = token.trim();
        if trimmed.eq_ignore_ascii_case("current") {
            return Ok(Self::Current);
        }
        trimmed
            .parse::<u32>()
            .map(Self::Version)
            .map_err(|_| ConfigurationError::UnknownBrowser(token.to_owned()))
    }
}

/// An emulated browser: family plus release track. Used only as a lookup key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BrowserIdentity {
    family: BrowserFamily,
    release: ReleaseTrack,
}

impl BrowserIdentity {
    /// Build an identity from its parts.
    #[inline]
    pub const fn new(family: BrowserFamily, release: ReleaseTrack) -> Self {
        Self { family, release }
    }

    /// The current release of a family.
    #[inline]
    pub const fn current(family: BrowserFamily) -> Self {
        Self::new(family, ReleaseTrack::Current)
    }

    /// A numbered release of a family.
    #[inline]
    pub const fn version(family: BrowserFamily, number: u32) -> Self {
        Self::new(family, ReleaseTrack::Version(number))
    }

    #[inline]
    pub const fn family(self) -> BrowserFamily {
        self.family
    }

    #[inline]
    pub const fn release(self) -> ReleaseTrack {
        self.release
    }

    /// The current release of every family.
    pub fn all_current() -> impl Iterator<Item = Self> {
        BrowserFamily::ALL.into_iter().map(Self::current)
    }
}

impl Display for BrowserIdentity {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FmtResult {
        match self.release {
            ReleaseTrack::Current => write!(formatter, "{}", self.family),
            ReleaseTrack::Version(number) => write!(formatter, "{}:{number}", self.family),
        }
    }
}

impl FromStr for BrowserIdentity {
    type Err = ConfigurationError;

    /// Parse `family` or `family:release`, e.g. `chrome`, `ie:11`, `ff:current`.
    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let (family_token, release_token) = token
            .split_once(':')
            .map_or((token, None), |(family_part, release_part)| (family_part, Some(release_part)));
        let family = BrowserFamily::from_token(family_token)
            .ok_or_else(|| ConfigurationError::UnknownBrowser(token.to_owned()))?;
        let release = match release_token {
            Some(release_part) => release_part
                .parse::<ReleaseTrack>()
                .map_err(|_| ConfigurationError::UnknownBrowser(token.to_owned()))?,
            None => ReleaseTrack::Current,
        };
        Ok(Self::new(family, release))
    }
}
