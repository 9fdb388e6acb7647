use crate::foundation::error::{GlitchwaveError, GlitchwaveResult};
use crate::foundation::rng::RandomSource;

/// Default glyph pool: ASCII letters, digits and punctuation.
pub const DEFAULT_CHARSET: &str =
    "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*()_+-=[]{}|;:,.<>?";

/// Uniform sampler over a fixed character pool.
#[derive(Clone, Debug)]
pub struct CharSampler {
    chars: Vec<char>,
}

impl Default for CharSampler {
    fn default() -> Self {
        Self {
            chars: DEFAULT_CHARSET.chars().collect(),
        }
    }
}

impl CharSampler {
    /// Build a sampler from `charset`, dropping duplicates. At least two distinct characters are
    /// required so a forced resample can always pick a different one.
    pub fn new(charset: &str) -> GlitchwaveResult<Self> {
        let mut chars: Vec<char> = Vec::new();
        for c in charset.chars() {
            if !chars.contains(&c) {
                chars.push(c);
            }
        }
        if chars.len() < 2 {
            return Err(GlitchwaveError::validation(
                "glitch charset must contain at least two distinct characters",
            ));
        }
        Ok(Self { chars })
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn contains(&self, c: char) -> bool {
        self.chars.contains(&c)
    }

    pub fn sample(&self, rng: &mut impl RandomSource) -> char {
        self.chars[rng.next_index(self.chars.len())]
    }

    /// Sample uniformly among the pool minus `current`, so the result always differs from it.
    pub fn sample_other(&self, rng: &mut impl RandomSource, current: char) -> char {
        match self.chars.iter().position(|&c| c == current) {
            Some(skip) => {
                let i = rng.next_index(self.chars.len() - 1);
                let i = if i >= skip { i + 1 } else { i };
                self.chars[i]
            }
            None => self.sample(rng),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/glitch/charset.rs"]
mod tests;
