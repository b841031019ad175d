use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{errors::ModelError, RecordId};

pub const MAX_CHIRP_LENGTH: usize = 140;
pub const CENSORED: &str = "****";

/// A stored chirp. `body` is already filtered when it reaches the store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: RecordId,
    pub body: String,
}

/// Length limit and banned words applied before a chirp is stored.
#[derive(Clone, Debug)]
pub struct ChirpPolicy {
    max_length: usize,
    banned_words: HashSet<String>,
}

impl Default for ChirpPolicy {
    fn default() -> Self {
        Self::new(MAX_CHIRP_LENGTH, ["kerfuffle", "sharbert", "fornax"])
    }
}

impl ChirpPolicy {
    pub fn new<I, S>(max_length: usize, banned_words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let banned_words = banned_words
            .into_iter()
            .map(|w| w.as_ref().to_lowercase())
            .collect();
        Self { max_length, banned_words }
    }

    pub fn max_length(&self) -> usize { self.max_length }

    /// Length is counted in characters, not bytes.
    pub fn validate_length(&self, body: &str) -> Result<(), ModelError> {
        let len = body.chars().count();
        if len > self.max_length {
            return Err(ModelError::Validation(format!(
                "chirp is too long ({len} > {})",
                self.max_length
            )));
        }
        Ok(())
    }

    /// Replace every space-separated word whose lowercase form is banned.
    /// Punctuation is part of the word, so `Sharbert!` passes through.
    pub fn clean(&self, body: &str) -> String {
        body.split(' ')
            .map(|word| {
                if self.banned_words.contains(&word.to_lowercase()) {
                    CENSORED
                } else {
                    word
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Validate then filter; the body handed to the store.
    pub fn apply(&self, body: &str) -> Result<String, ModelError> {
        self.validate_length(body)?;
        Ok(self.clean(body))
    }
}
