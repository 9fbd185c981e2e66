//! NAT2 marker positions and allele calls.
//!
//! This module defines the input side of the lookup:
//! - The six fixed marker positions (282, 341, 481, 590, 803, 857)
//! - The allele alphabet (`.` for wild type, then `A`, `C`, `G`, `T`)
//! - `ObservedAlleles`, a complete set of calls where anything not given
//!   reads as wild type
//!
//! Symbols outside the alphabet are rejected here, so the resolver only
//! ever compares valid calls.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Errors that can occur while reading allele calls.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AlleleError {
    #[error("Invalid allele symbol '{0}' (expected one of: . A C G T)")]
    InvalidSymbol(char),

    #[error("Invalid allele '{0}': expected a single symbol")]
    InvalidAllele(String),

    #[error("Invalid call '{0}' (expected POSITION=ALLELE, e.g. 282=T)")]
    MalformedCall(String),

    #[error("Position {0} listed twice")]
    DuplicatePosition(Position),
}

/// Result type for allele operations.
pub type AlleleResult<T> = Result<T, AlleleError>;

/// One of the six NAT2 marker positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Position {
    P282,
    P341,
    P481,
    P590,
    P803,
    P857,
}

impl Position {
    /// All positions, in ascending coordinate order.
    pub const ALL: [Position; 6] = [
        Position::P282,
        Position::P341,
        Position::P481,
        Position::P590,
        Position::P803,
        Position::P857,
    ];

    /// Returns the nucleotide coordinate of this position.
    pub fn coordinate(self) -> u16 {
        match self {
            Position::P282 => 282,
            Position::P341 => 341,
            Position::P481 => 481,
            Position::P590 => 590,
            Position::P803 => 803,
            Position::P857 => 857,
        }
    }

    /// Looks up a position by coordinate.
    pub fn from_coordinate(coordinate: u16) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.coordinate() == coordinate)
    }

    /// Slot index of this position within `ALL`.
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.coordinate())
    }
}

/// An observed allele at one marker position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Allele {
    /// Reference allele, written `.`
    #[default]
    Wild,
    A,
    C,
    G,
    T,
}

impl Allele {
    /// The full alphabet, in display order.
    pub const ALL: [Allele; 5] = [Allele::Wild, Allele::A, Allele::C, Allele::G, Allele::T];

    /// Returns the one-character symbol for this allele.
    pub fn symbol(self) -> char {
        match self {
            Allele::Wild => '.',
            Allele::A => 'A',
            Allele::C => 'C',
            Allele::G => 'G',
            Allele::T => 'T',
        }
    }

    /// Parses a symbol (case-insensitive).
    pub fn from_symbol(symbol: char) -> AlleleResult<Self> {
        match symbol.to_ascii_uppercase() {
            '.' => Ok(Allele::Wild),
            'A' => Ok(Allele::A),
            'C' => Ok(Allele::C),
            'G' => Ok(Allele::G),
            'T' => Ok(Allele::T),
            _ => Err(AlleleError::InvalidSymbol(symbol)),
        }
    }

    /// Returns true for the reference allele.
    pub fn is_wild(self) -> bool {
        self == Allele::Wild
    }
}

impl TryFrom<char> for Allele {
    type Error = AlleleError;

    fn try_from(symbol: char) -> AlleleResult<Self> {
        Self::from_symbol(symbol)
    }
}

impl FromStr for Allele {
    type Err = AlleleError;

    fn from_str(s: &str) -> AlleleResult<Self> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::from_symbol(c),
            _ => Err(AlleleError::InvalidAllele(s.to_string())),
        }
    }
}

impl fmt::Display for Allele {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A complete set of calls at the six marker positions.
///
/// Positions that were never set hold `Allele::Wild`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ObservedAlleles {
    calls: [Allele; 6],
}

impl ObservedAlleles {
    /// Creates an all-wild-type set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a set from calls given in `Position::ALL` order.
    pub const fn from_calls(calls: [Allele; 6]) -> Self {
        Self { calls }
    }

    /// Returns the call at a position.
    pub fn get(&self, position: Position) -> Allele {
        self.calls[position.index()]
    }

    /// Sets the call at a position.
    pub fn set(&mut self, position: Position, allele: Allele) {
        self.calls[position.index()] = allele;
    }

    /// Builder form of `set`.
    pub fn with(mut self, position: Position, allele: Allele) -> Self {
        self.set(position, allele);
        self
    }

    /// Iterates over `(position, allele)` in ascending position order.
    pub fn iter(&self) -> impl Iterator<Item = (Position, Allele)> + '_ {
        Position::ALL.into_iter().map(move |p| (p, self.get(p)))
    }

    /// Number of positions carrying a non-reference call.
    pub fn variant_count(&self) -> usize {
        self.calls.iter().filter(|a| !a.is_wild()).count()
    }

    /// Builds a set from raw `(coordinate, symbol)` pairs.
    ///
    /// Coordinates outside the six marker positions are ignored. Absent
    /// positions stay wild type. A position given twice is an error.
    pub fn from_coordinates<I>(pairs: I) -> AlleleResult<Self>
    where
        I: IntoIterator<Item = (u16, char)>,
    {
        let mut builder = CallSet::default();
        for (coordinate, symbol) in pairs {
            let allele = Allele::from_symbol(symbol)?;
            match Position::from_coordinate(coordinate) {
                Some(position) => builder.insert(position, allele)?,
                None => tracing::debug!(coordinate, "ignoring call outside NAT2 marker positions"),
            }
        }
        Ok(builder.observed)
    }

    /// Parses one `POSITION=ALLELE` call (`:` is accepted in place of `=`).
    ///
    /// Returns `Ok(None)` for a well-formed call at a coordinate that is not
    /// one of the six marker positions.
    pub fn parse_call(call: &str) -> AlleleResult<Option<(Position, Allele)>> {
        let call = call.trim();
        let (position, allele) = call
            .split_once(|c: char| c == '=' || c == ':')
            .ok_or_else(|| AlleleError::MalformedCall(call.to_string()))?;
        let position = position.trim();
        if position.is_empty() || !position.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AlleleError::MalformedCall(call.to_string()));
        }
        let allele: Allele = allele.parse()?;
        // Too large for u16 is simply not a marker position
        Ok(position
            .parse::<u16>()
            .ok()
            .and_then(Position::from_coordinate)
            .map(|p| (p, allele)))
    }
}

/// Collects calls, refusing a second call at the same position.
#[derive(Debug, Default)]
pub(crate) struct CallSet {
    pub(crate) observed: ObservedAlleles,
    seen: [bool; 6],
}

impl CallSet {
    pub(crate) fn insert(&mut self, position: Position, allele: Allele) -> AlleleResult<()> {
        let seen = &mut self.seen[position.index()];
        if *seen {
            return Err(AlleleError::DuplicatePosition(position));
        }
        *seen = true;
        self.observed.set(position, allele);
        Ok(())
    }
}

impl FromStr for ObservedAlleles {
    type Err = AlleleError;

    /// Parses a call list such as `"282=T,590=A"` or `"282:T 590:A"`.
    ///
    /// Listing the same position twice is an error.
    fn from_str(s: &str) -> AlleleResult<Self> {
        let mut builder = CallSet::default();
        for call in s.split(|c: char| c == ',' || c.is_whitespace()) {
            if call.is_empty() {
                continue;
            }
            match Self::parse_call(call)? {
                Some((position, allele)) => builder.insert(position, allele)?,
                None => tracing::debug!(call, "ignoring call outside NAT2 marker positions"),
            }
        }
        Ok(builder.observed)
    }
}

impl fmt::Display for ObservedAlleles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (position, allele)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}={}", position, allele)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_coordinates() {
        let coords: Vec<u16> = Position::ALL.iter().map(|p| p.coordinate()).collect();
        assert_eq!(coords, vec![282, 341, 481, 590, 803, 857]);
        assert_eq!(Position::from_coordinate(590), Some(Position::P590));
        assert_eq!(Position::from_coordinate(591), None);
    }

    #[test]
    fn test_allele_symbols() {
        assert_eq!(Allele::from_symbol('.'), Ok(Allele::Wild));
        assert_eq!(Allele::from_symbol('t'), Ok(Allele::T)); // Case insensitive
        assert_eq!(Allele::from_symbol('N'), Err(AlleleError::InvalidSymbol('N')));
        assert_eq!(Allele::from_symbol('-'), Err(AlleleError::InvalidSymbol('-')));
        // Errors echo the symbol as typed
        assert_eq!(Allele::from_symbol('x'), Err(AlleleError::InvalidSymbol('x')));
        assert_eq!(
            Allele::from_symbol('x').unwrap_err().to_string(),
            "Invalid allele symbol 'x' (expected one of: . A C G T)"
        );
        assert_eq!("G".parse::<Allele>(), Ok(Allele::G));
        assert!("GT".parse::<Allele>().is_err());
        assert!("".parse::<Allele>().is_err());
    }

    #[test]
    fn test_default_is_wild_type() {
        let observed = ObservedAlleles::new();
        assert!(observed.iter().all(|(_, a)| a == Allele::Wild));
        assert_eq!(observed.variant_count(), 0);
    }

    #[test]
    fn test_from_coordinates_ignores_unknown_positions() {
        let observed = ObservedAlleles::from_coordinates([(282, 'T'), (999, 'A'), (590, 'a')]).unwrap();
        assert_eq!(observed.get(Position::P282), Allele::T);
        assert_eq!(observed.get(Position::P590), Allele::A);
        assert_eq!(observed.get(Position::P341), Allele::Wild);
        assert_eq!(observed.variant_count(), 2);
    }

    #[test]
    fn test_from_coordinates_rejects_bad_symbol() {
        let result = ObservedAlleles::from_coordinates([(282, 'X')]);
        assert_eq!(result, Err(AlleleError::InvalidSymbol('X')));
    }

    #[test]
    fn test_parse_call_list() {
        let observed: ObservedAlleles = "282=T, 590:A".parse().unwrap();
        assert_eq!(observed, ObservedAlleles::new().with(Position::P282, Allele::T).with(Position::P590, Allele::A));

        let empty: ObservedAlleles = "".parse().unwrap();
        assert_eq!(empty, ObservedAlleles::new());
    }

    #[test]
    fn test_parse_call_errors() {
        assert!(matches!(ObservedAlleles::parse_call("282T"), Err(AlleleError::MalformedCall(_))));
        assert!(matches!(ObservedAlleles::parse_call("abc=T"), Err(AlleleError::MalformedCall(_))));
        assert!(matches!(ObservedAlleles::parse_call("282=Z"), Err(AlleleError::InvalidSymbol('Z'))));
        assert_eq!(ObservedAlleles::parse_call("100=A"), Ok(None));
        assert!(matches!(ObservedAlleles::parse_call("-282=T"), Err(AlleleError::MalformedCall(_))));
    }

    #[test]
    fn test_out_of_range_coordinate_is_ignored() {
        assert_eq!(ObservedAlleles::parse_call("70000=A"), Ok(None));
        assert_eq!(ObservedAlleles::parse_call("123456789012345678901234=T"), Ok(None));
        let observed: ObservedAlleles = "70000=A,282=T".parse().unwrap();
        assert_eq!(observed, ObservedAlleles::new().with(Position::P282, Allele::T));
    }

    #[test]
    fn test_duplicate_position_is_rejected() {
        assert_eq!(
            "282=T,282=.".parse::<ObservedAlleles>(),
            Err(AlleleError::DuplicatePosition(Position::P282))
        );
        assert_eq!(
            ObservedAlleles::from_coordinates([(590, 'A'), (590, 'A')]),
            Err(AlleleError::DuplicatePosition(Position::P590))
        );
        // Ignored coordinates never collide
        assert!("100=A,100=C".parse::<ObservedAlleles>().is_ok());
    }

    #[test]
    fn test_display() {
        let observed = ObservedAlleles::new().with(Position::P803, Allele::A);
        assert_eq!(observed.to_string(), "282=. 341=. 481=. 590=. 803=A 857=.");
    }
}
