//! Random alias generation.
//!
//! Aliases are drawn symbol by symbol from a configurable alphabet with a
//! uniform, bias-free sampler over a cryptographically secure RNG.

use rand::Rng;
use rand::distr::{Distribution, Uniform};

use crate::utils::validation::{is_identifier_char, is_reserved_alias};

/// Default alphabet: digits, upper-case, lower-case (62 symbols).
pub const DEFAULT_ALPHABET: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Default number of symbols in a generated alias.
pub const DEFAULT_ALIAS_LENGTH: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeneratorError {
    #[error("alphabet must not be empty")]
    EmptyAlphabet,

    #[error("alphabet contains duplicate symbol '{0}'")]
    DuplicateSymbol(char),

    #[error("alphabet symbol '{0}' is not allowed in aliases")]
    InvalidSymbol(char),

    #[error("alias length must be greater than zero")]
    ZeroLength,
}

/// Generates fixed-length random aliases.
///
/// Every position is sampled independently and uniformly from the alphabet,
/// so there are `alphabet.len() ^ length` possible aliases.
///
/// # Randomness
///
/// Uses [`rand::rng`], a ChaCha-based CSPRNG reseeded from the operating
/// system. Indices come from a precomputed [`Uniform`] distribution, which
/// rejects values outside the acceptance zone instead of reducing modulo
/// the alphabet size.
#[derive(Debug, Clone)]
pub struct AliasGenerator {
    alphabet: Vec<char>,
    index: Uniform<usize>,
    length: usize,
}

impl AliasGenerator {
    /// Creates a generator.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError`] if the alphabet is empty, has duplicates
    /// (duplicates would skew the distribution) or symbols outside
    /// `[A-Za-z0-9_-]`, or if `length` is zero.
    pub fn new(alphabet: &str, length: usize) -> Result<Self, GeneratorError> {
        if length == 0 {
            return Err(GeneratorError::ZeroLength);
        }

        let mut symbols: Vec<char> = Vec::with_capacity(alphabet.len());
        for c in alphabet.chars() {
            if !is_identifier_char(c) {
                return Err(GeneratorError::InvalidSymbol(c));
            }
            if symbols.contains(&c) {
                return Err(GeneratorError::DuplicateSymbol(c));
            }
            symbols.push(c);
        }

        let index = Uniform::new(0, symbols.len()).map_err(|_| GeneratorError::EmptyAlphabet)?;

        Ok(Self {
            alphabet: symbols,
            index,
            length,
        })
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn alphabet(&self) -> &[char] {
        &self.alphabet
    }

    /// Number of distinct aliases this generator can produce, saturating.
    pub fn keyspace(&self) -> u128 {
        (self.alphabet.len() as u128).saturating_pow(self.length as u32)
    }

    /// Draws a fresh alias.
    pub fn generate(&self) -> String {
        self.generate_with(&mut rand::rng())
    }

    /// Draws a fresh alias from the given RNG.
    ///
    /// Draws that spell a reserved route name are discarded.
    pub fn generate_with<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        loop {
            let alias: String = (0..self.length)
                .map(|_| self.alphabet[self.index.sample(rng)])
                .collect();

            if !is_reserved_alias(&alias) {
                return alias;
            }
        }
    }
}

impl Default for AliasGenerator {
    fn default() -> Self {
        let alphabet: Vec<char> = DEFAULT_ALPHABET.chars().collect();
        let index = Uniform::new(0, alphabet.len()).expect("default alphabet is non-empty");

        Self {
            alphabet,
            index,
            length: DEFAULT_ALIAS_LENGTH,
        }
    }
}
