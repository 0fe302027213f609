//! RNG module - piece selection sources
//!
//! The engine draws every new piece from a [`PieceSource`]. The default,
//! [`RandomPieces`], picks uniformly over the seven kinds *with replacement*
//! (no 7-bag): each draw is independent, so repeats and droughts happen.
//!
//! Sources are seedable so a game can be replayed, and [`ScriptedPieces`]
//! feeds a fixed sequence for tests.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::types::PieceKind;

/// Supplies the kind of each newly chosen piece
pub trait PieceSource {
    fn next_kind(&mut self) -> PieceKind;
}

/// Uniform random piece selection backed by a seeded PCG stream
#[derive(Debug, Clone)]
pub struct RandomPieces {
    seed: u64,
    rng: Pcg32,
}

impl RandomPieces {
    /// Create a new source with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Create a source seeded from OS entropy
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    /// Seed this source was created with (for replaying a game)
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl Default for RandomPieces {
    fn default() -> Self {
        Self::new(1)
    }
}

impl PieceSource for RandomPieces {
    fn next_kind(&mut self) -> PieceKind {
        PieceKind::from_index(self.rng.random_range(0..PieceKind::ALL.len()))
    }
}

/// Cycles through a fixed sequence of kinds
#[derive(Debug, Clone)]
pub struct ScriptedPieces {
    sequence: Vec<PieceKind>,
    index: usize,
}

impl ScriptedPieces {
    /// Create a scripted source.
    ///
    /// An empty sequence falls back to a single `I`.
    pub fn new(sequence: impl Into<Vec<PieceKind>>) -> Self {
        let mut sequence = sequence.into();
        if sequence.is_empty() {
            sequence.push(PieceKind::I);
        }
        Self { sequence, index: 0 }
    }

    /// Always yields the same kind
    pub fn repeat(kind: PieceKind) -> Self {
        Self::new(vec![kind])
    }

    /// Number of kinds drawn so far
    pub fn drawn(&self) -> usize {
        self.index
    }
}

impl PieceSource for ScriptedPieces {
    fn next_kind(&mut self) -> PieceKind {
        let kind = self.sequence[self.index % self.sequence.len()];
        self.index += 1;
        kind
    }
}

impl<S: PieceSource + ?Sized> PieceSource for Box<S> {
    fn next_kind(&mut self) -> PieceKind {
        (**self).next_kind()
    }
}
