//! Text notation for intervals.
//!
//! Syntax:
//! ```text
//! 3/2          ; fraction
//! 5            ; integer
//! 7\12         ; 7 steps of 12-EDO (equave 2/1)
//! 4\13<3>      ; 4 steps of 13 equal divisions of 3/1
//! 701.955      ; cents
//! 1,5          ; decimal ratio (floating point)
//! [-4 4 -1>    ; monzo, fractional exponents allowed
//! ```

use num_bigint::BigInt;
use num_traits::{One, Zero};
use thiserror::Error;

use crate::exact::{self, Fraction};
use crate::monzo::{ExtendedMonzo, MonzoError};

/// Parse an interval with `number_of_components` components.
pub fn parse_interval(input: &str, number_of_components: usize) -> Result<ExtendedMonzo, ParseError> {
    let s = input.trim();
    if s.is_empty() {
        return Err(ParseError::Empty);
    }

    if let Some(body) = s.strip_prefix('[') {
        let body = body
            .strip_suffix('>')
            .ok_or_else(|| ParseError::InvalidNotation(s.to_string()))?;
        return parse_monzo(body, number_of_components);
    }

    if let Some((steps, rest)) = s.split_once('\\') {
        let (divisions, equave) = match rest.split_once('<') {
            Some((divisions, equave)) => {
                let equave = equave
                    .strip_suffix('>')
                    .ok_or_else(|| ParseError::InvalidNotation(s.to_string()))?;
                (divisions, parse_fraction(equave)?)
            }
            None => (rest, Fraction::from_integer(BigInt::from(2))),
        };
        let steps = parse_integer(steps)?;
        let divisions = parse_integer(divisions)?;
        if divisions.is_zero() {
            return Err(ParseError::Monzo(MonzoError::DivisionByZero));
        }
        let fraction_of_equave = Fraction::new(steps, divisions);
        return Ok(ExtendedMonzo::from_equal_temperament(
            &fraction_of_equave,
            &equave,
            number_of_components,
        )?);
    }

    if s.contains(',') {
        let value: f64 = s
            .replace(',', ".")
            .parse()
            .map_err(|_| ParseError::InvalidNumber(s.to_string()))?;
        return Ok(ExtendedMonzo::from_value(value, number_of_components)?);
    }

    if s.contains('.') {
        let cents: f64 = s
            .parse()
            .map_err(|_| ParseError::InvalidNumber(s.to_string()))?;
        return Ok(ExtendedMonzo::from_cents(cents, number_of_components)?);
    }

    let value = parse_fraction(s)?;
    Ok(ExtendedMonzo::from_fraction(&value, number_of_components)?)
}

/// Parse a prime subgroup like `2.3.7` into component indices.
pub fn parse_subgroup(input: &str) -> Result<Vec<usize>, ParseError> {
    input
        .trim()
        .split('.')
        .map(|part| {
            let p: u32 = part
                .trim()
                .parse()
                .map_err(|_| ParseError::InvalidNumber(part.to_string()))?;
            exact::prime_index(p).ok_or(ParseError::NotPrime(p))
        })
        .collect()
}

/// Parse `n` or `n/d`.
pub fn parse_fraction(input: &str) -> Result<Fraction, ParseError> {
    let s = input.trim();
    match s.split_once('/') {
        Some((numer, denom)) => {
            let numer = parse_integer(numer)?;
            let denom = parse_integer(denom)?;
            if denom.is_zero() {
                return Err(ParseError::Monzo(MonzoError::DivisionByZero));
            }
            Ok(Fraction::new(numer, denom))
        }
        None => Ok(Fraction::from_integer(parse_integer(s)?)),
    }
}

fn parse_integer(input: &str) -> Result<BigInt, ParseError> {
    let s = input.trim();
    s.parse()
        .map_err(|_| ParseError::InvalidNumber(s.to_string()))
}

fn parse_monzo(body: &str, number_of_components: usize) -> Result<ExtendedMonzo, ParseError> {
    let mut vector = body
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|part| !part.is_empty())
        .map(parse_fraction)
        .collect::<Result<Vec<_>, _>>()?;

    if vector.len() > number_of_components {
        return Err(ParseError::NotEnoughComponents {
            needed: vector.len(),
            got: number_of_components,
        });
    }
    vector.resize(number_of_components, Fraction::zero());
    Ok(ExtendedMonzo::new(vector, Fraction::one(), 0.0)?)
}

/// Errors that can occur when parsing interval notation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("empty interval")]
    Empty,

    #[error("invalid number: '{0}'")]
    InvalidNumber(String),

    #[error("invalid interval notation: '{0}'")]
    InvalidNotation(String),

    #[error("{0} is not a tabulated prime")]
    NotPrime(u32),

    #[error("Not enough components: monzo has {needed} exponents but only {got} components are in use")]
    NotEnoughComponents { needed: usize, got: usize },

    #[error(transparent)]
    Monzo(#[from] MonzoError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exact::fraction;

    #[test]
    fn test_parse_fraction_and_integer() {
        let fifth = parse_interval("3/2", 3).unwrap();
        assert_eq!(fifth.to_fraction().unwrap(), fraction(3, 2));

        let five = parse_interval(" 5 ", 3).unwrap();
        assert_eq!(five.vector()[2], fraction(1, 1));
    }

    #[test]
    fn test_parse_equal_temperament() {
        let step = parse_interval("7\\12", 3).unwrap();
        assert_eq!(step.to_equal_temperament().unwrap(), (fraction(7, 12), fraction(2, 1)));

        let bp = parse_interval("4\\13<3>", 3).unwrap();
        assert_eq!(bp.to_equal_temperament().unwrap(), (fraction(4, 13), fraction(3, 1)));

        assert!(parse_interval("1\\0", 3).is_err());
    }

    #[test]
    fn test_parse_cents_and_decimal() {
        let cents = parse_interval("701.955", 3).unwrap();
        assert_eq!(cents.cents(), 701.955);

        let decimal = parse_interval("1,5", 3).unwrap();
        assert!((decimal.value_of() - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_parse_monzo() {
        let comma = parse_interval("[-4 4 -1>", 3).unwrap();
        assert_eq!(comma.to_fraction().unwrap(), fraction(81, 80));

        let padded = parse_interval("[1/2>", 3).unwrap();
        assert_eq!(padded.vector(), &[fraction(1, 2), fraction(0, 1), fraction(0, 1)][..]);

        assert!(matches!(
            parse_interval("[1 2 3 4>", 3),
            Err(ParseError::NotEnoughComponents { needed: 4, got: 3 })
        ));
        assert!(matches!(parse_interval("[1 2", 3), Err(ParseError::InvalidNotation(_))));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse_interval("  ", 3).unwrap_err(), ParseError::Empty);
        assert!(matches!(parse_interval("abc", 3), Err(ParseError::InvalidNumber(_))));
        assert!(matches!(parse_interval("-3/2", 3), Err(ParseError::Monzo(MonzoError::NonPositive(_)))));
    }

    #[test]
    fn test_parse_subgroup() {
        assert_eq!(parse_subgroup("2.3.7").unwrap(), vec![0, 1, 3]);
        assert_eq!(parse_subgroup("2.9").unwrap_err(), ParseError::NotPrime(9));
    }
}
