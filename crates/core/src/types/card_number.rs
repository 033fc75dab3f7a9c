//! Card number type and generator.
//!
//! Card numbers are 16 decimal digits drawn uniformly at random. They carry
//! no check digit and no issuer prefix, and nothing guarantees two issued
//! numbers differ.

use core::fmt;
use std::sync::{Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`CardNumber`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CardNumberError {
    /// The input does not have exactly 16 characters.
    #[error("card number must be exactly {expected} digits (got {actual})")]
    WrongLength {
        /// Required length.
        expected: usize,
        /// Length of the input.
        actual: usize,
    },
    /// The input contains a character outside `0`-`9`.
    #[error("card number must contain only digits 0-9")]
    NonDigit,
}

/// A 16-digit card number.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct CardNumber(String);

impl CardNumber {
    /// Number of digits in a card number.
    pub const LENGTH: usize = 16;

    /// Parse a `CardNumber` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not exactly 16 ASCII digits.
    pub fn parse(s: &str) -> Result<Self, CardNumberError> {
        if s.len() != Self::LENGTH {
            return Err(CardNumberError::WrongLength {
                expected: Self::LENGTH,
                actual: s.len(),
            });
        }

        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CardNumberError::NonDigit);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the card number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `CardNumber` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for CardNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for CardNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Produces random card numbers from a single shared random source.
///
/// The source is seeded once at construction and guarded by a mutex, so one
/// generator can be shared by every request handler (wrap it in an `Arc`).
/// Not suitable for anything that needs unpredictability guarantees.
///
/// # Example
///
/// ```
/// use creditcards_core::CardNumberGenerator;
///
/// let generator = CardNumberGenerator::new();
/// let number = generator.generate();
/// assert_eq!(number.as_str().len(), 16);
/// ```
#[derive(Debug)]
pub struct CardNumberGenerator {
    rng: Mutex<StdRng>,
}

impl CardNumberGenerator {
    /// Create a generator seeded from the operating system's entropy source.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Create a deterministic generator from a fixed seed.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Generate a new card number.
    ///
    /// Each digit is chosen independently and uniformly from `0`-`9`.
    #[must_use]
    pub fn generate(&self) -> CardNumber {
        // RNG state stays valid across a poisoning panic.
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);

        let number = (0..CardNumber::LENGTH)
            .map(|_| char::from(b'0' + rng.random_range(0..10_u8)))
            .collect();

        CardNumber(number)
    }
}

impl Default for CardNumberGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use super::*;

    #[test]
    fn test_generate_is_sixteen_digits() {
        let generator = CardNumberGenerator::new();
        for _ in 0..1_000 {
            let number = generator.generate();
            assert_eq!(number.as_str().len(), 16);
            assert!(number.as_str().bytes().all(|b| b.is_ascii_digit()));
        }
    }

    #[test]
    fn test_generated_numbers_parse() {
        let generator = CardNumberGenerator::seeded(1);
        let number = generator.generate();
        assert_eq!(CardNumber::parse(number.as_str()).unwrap(), number);
    }

    #[test]
    fn test_seeded_is_deterministic() {
        let a = CardNumberGenerator::seeded(42);
        let b = CardNumberGenerator::seeded(42);
        for _ in 0..10 {
            assert_eq!(a.generate(), b.generate());
        }
    }

    #[test]
    fn test_successive_calls_differ() {
        let generator = CardNumberGenerator::new();
        let numbers: HashSet<_> = (0..100).map(|_| generator.generate()).collect();
        // 100 draws from 10^16 values; a repeat would point at a reused seed.
        assert_eq!(numbers.len(), 100);
    }

    #[test]
    fn test_every_digit_appears() {
        let generator = CardNumberGenerator::seeded(7);
        let digits: HashSet<u8> = (0..200)
            .flat_map(|_| generator.generate().into_inner().into_bytes())
            .collect();
        assert_eq!(digits.len(), 10);
    }

    #[test]
    fn test_shared_across_threads() {
        let generator = Arc::new(CardNumberGenerator::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let generator = Arc::clone(&generator);
                std::thread::spawn(move || generator.generate())
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap().as_str().len(), 16);
        }
    }

    #[test]
    fn test_parse_wrong_length() {
        assert_eq!(
            CardNumber::parse("123"),
            Err(CardNumberError::WrongLength {
                expected: 16,
                actual: 3
            })
        );
    }

    #[test]
    fn test_parse_non_digit() {
        assert_eq!(
            CardNumber::parse("12345678901234a6"),
            Err(CardNumberError::NonDigit)
        );
    }

    #[test]
    fn test_serializes_as_string() {
        let number = CardNumber::parse("0000111122223333").unwrap();
        assert_eq!(
            serde_json::to_string(&number).unwrap(),
            "\"0000111122223333\""
        );
    }
}
