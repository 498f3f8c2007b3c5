//! Domain models for positions, selections, and evaluation exchanges.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// Zero-based location inside a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub line: usize,
    pub character: usize,
}

impl Position {
    pub fn new(line: usize, character: usize) -> Self {
        Self { line, character }
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        self.line
            .cmp(&other.line)
            .then(self.character.cmp(&other.character))
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.character)
    }
}

impl FromStr for Position {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || DomainError::InvalidSelection(format!("malformed position '{value}'"));
        let (line, character) = value.trim().split_once(':').ok_or_else(invalid)?;
        Ok(Self {
            line: line.trim().parse().map_err(|_| invalid())?,
            character: character.trim().parse().map_err(|_| invalid())?,
        })
    }
}

/// A range in a document. `start <= end` always holds for constructed values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Selection {
    start: Position,
    end: Position,
}

impl Selection {
    /// Build a selection, swapping the anchors when they are given bottom-up.
    pub fn new(a: Position, b: Position) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn end(&self) -> Position {
        self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Parses `LINE:COL-LINE:COL`, or `LINE:COL` for an empty selection.
impl FromStr for Selection {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.split_once('-') {
            Some((start, end)) => Ok(Self::new(start.parse()?, end.parse()?)),
            None => {
                let at: Position = value.parse()?;
                Ok(Self::new(at, at))
            }
        }
    }
}

/// Trimmed fragments, in normalized selection order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EvaluationRequest {
    pub fragments: Vec<String>,
}

impl EvaluationRequest {
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}

/// Printable representations, index-aligned with the originating request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EvaluationResponse {
    pub results: Vec<String>,
}

impl EvaluationResponse {
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_range_and_point_selections() {
        let range: Selection = "3:4-5:0".parse().unwrap();
        assert_eq!(range.start(), Position::new(3, 4));
        assert_eq!(range.end(), Position::new(5, 0));

        let point: Selection = "7:2".parse().unwrap();
        assert!(point.is_empty());
        assert_eq!(point.to_string(), "7:2-7:2");
    }

    #[test]
    fn reversed_anchors_are_normalized() {
        let selection: Selection = "4:1-2:9".parse().unwrap();
        assert_eq!(selection.start(), Position::new(2, 9));
        assert_eq!(selection.end(), Position::new(4, 1));
    }

    #[test]
    fn rejects_malformed_positions() {
        assert!("".parse::<Selection>().is_err());
        assert!("1-2".parse::<Selection>().is_err());
        assert!("a:b-1:2".parse::<Selection>().is_err());
        assert!("1:-2:3".parse::<Selection>().is_err());
    }

    #[test]
    fn request_serializes_as_plain_array() {
        let request = EvaluationRequest {
            fragments: vec!["1+1".into(), "i.__next__()".into()],
        };
        assert_eq!(
            serde_json::to_string(&request).unwrap(),
            r#"["1+1","i.__next__()"]"#
        );
        let response: EvaluationResponse = serde_json::from_str(r#"["2","0"]"#).unwrap();
        assert_eq!(response.results, vec!["2", "0"]);
    }
}
