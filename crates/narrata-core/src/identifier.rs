//! Artifact identifiers
//!
//! Every request gets one random lowercase identifier that names both the
//! stored image and its derived audio. Uniqueness is probabilistic: 26^30
//! possible values make a collision between live requests negligible.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::constants::{ARTIFACT_ID_LENGTH, AUDIO_EXTENSION};

/// Base blob name shared by one request's image and audio.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtifactId(String);

impl ArtifactId {
    /// Draw a fresh identifier of `ARTIFACT_ID_LENGTH` characters in `a..=z`.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let id = (0..ARTIFACT_ID_LENGTH)
            .map(|_| char::from(rng.random_range(b'a'..=b'z')))
            .collect();
        ArtifactId(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Blob name of the image upload.
    pub fn image_blob_name(&self) -> String {
        self.0.clone()
    }

    /// Blob name of the synthesized audio: `{id}.wav`.
    pub fn audio_blob_name(&self) -> String {
        format!("{}.{}", self.0, AUDIO_EXTENSION)
    }
}

impl Display for ArtifactId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

/// Source of artifact identifiers, injected into the pipeline.
pub trait IdSource: Send + Sync {
    fn next_id(&self) -> ArtifactId;
}

/// Production source backed by the thread-local RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIdSource;

impl IdSource for RandomIdSource {
    fn next_id(&self) -> ArtifactId {
        ArtifactId::generate(&mut rand::rng())
    }
}

/// Deterministic source for tests: same seed, same sequence of identifiers.
#[derive(Debug)]
pub struct SeededIdSource {
    rng: Mutex<StdRng>,
}

impl SeededIdSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl IdSource for SeededIdSource {
    fn next_id(&self) -> ArtifactId {
        // A poisoned lock only means another test thread panicked mid-draw.
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        ArtifactId::generate(&mut *rng)
    }
}
