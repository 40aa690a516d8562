//! Route identifier tokens.

use std::fmt;

use serde::Serialize;

/// Error returned when parsing an invalid route token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid route token: {reason}")]
pub struct InvalidRouteToken {
    reason: &'static str,
}

fn validate_numeric_token(s: &str) -> Result<(), InvalidRouteToken> {
    if s.is_empty() {
        return Err(InvalidRouteToken {
            reason: "must not be empty",
        });
    }
    if s.len() > 16 {
        return Err(InvalidRouteToken {
            reason: "must be at most 16 characters",
        });
    }
    if !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(InvalidRouteToken {
            reason: "must be ASCII digits only",
        });
    }
    Ok(())
}

/// A route market identifier ("route_mkt").
///
/// This is the stable, direction-independent token the upstream feed uses to
/// identify a bus line across timetable versions (e.g. `23056` for Metropoline
/// line 56). Opaque to us beyond being a short numeric token; validated by
/// construction.
///
/// # Examples
///
/// ```
/// use bus_locator::domain::RouteMkt;
///
/// let mkt = RouteMkt::parse("23056").unwrap();
/// assert_eq!(mkt.as_str(), "23056");
///
/// assert!(RouteMkt::parse("").is_err());
/// assert!(RouteMkt::parse("23-56").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RouteMkt(String);

impl RouteMkt {
    /// Parse a route_mkt token. Must be 1-16 ASCII digits.
    pub fn parse(s: &str) -> Result<Self, InvalidRouteToken> {
        validate_numeric_token(s)?;
        Ok(Self(s.to_string()))
    }

    /// Returns the token as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for RouteMkt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RouteMkt({})", self.0)
    }
}

impl fmt::Display for RouteMkt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A per-direction line reference.
///
/// Resolved from a [`RouteMkt`] via the GTFS routes endpoint; this is the key
/// the SIRI vehicle-locations endpoint is queried by. One route_mkt commonly
/// maps to several line refs (one per direction/variant).
#[derive(Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct LineRef(String);

impl LineRef {
    /// Parse a line_ref token. Same shape as route_mkt: 1-16 ASCII digits.
    pub fn parse(s: &str) -> Result<Self, InvalidRouteToken> {
        validate_numeric_token(s)?;
        Ok(Self(s.to_string()))
    }

    /// Returns the token as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for LineRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LineRef({})", self.0)
    }
}

impl fmt::Display for LineRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_tokens() {
        assert_eq!(RouteMkt::parse("23056").unwrap().as_str(), "23056");
        assert_eq!(LineRef::parse("7020").unwrap().as_str(), "7020");
        assert!(RouteMkt::parse("1").is_ok());
    }

    #[test]
    fn rejects_empty() {
        assert!(RouteMkt::parse("").is_err());
        assert!(LineRef::parse("").is_err());
    }

    #[test]
    fn rejects_non_digits() {
        assert!(RouteMkt::parse("23a56").is_err());
        assert!(RouteMkt::parse("23 56").is_err());
        assert!(LineRef::parse("-7020").is_err());
    }

    #[test]
    fn rejects_overlong() {
        assert!(RouteMkt::parse("12345678901234567").is_err());
    }

    #[test]
    fn display_round_trip() {
        let mkt = RouteMkt::parse("23056").unwrap();
        assert_eq!(mkt.to_string(), "23056");
        assert_eq!(format!("{mkt:?}"), "RouteMkt(23056)");
    }
}
