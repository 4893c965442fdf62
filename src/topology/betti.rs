//! Betti numbers
//!
//! The k-th Betti number βₖ counts the k-dimensional holes of a complex:
//!
//! - β₀: connected components
//! - β₁: loops
//! - β₂: voids

use serde::Serialize;
use strum_macros::{Display, EnumIter};

/// Homology dimensions reported by the bifiltration sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, Display)]
pub enum HomologyDimension {
    #[strum(to_string = "Betti-0 (Connected Components)")]
    Components,
    #[strum(to_string = "Betti-1 (Loops)")]
    Loops,
    #[strum(to_string = "Betti-2 (Voids)")]
    Voids,
}
impl HomologyDimension {
    pub fn index(&self) -> usize {
        match self {
            HomologyDimension::Components => 0,
            HomologyDimension::Loops => 1,
            HomologyDimension::Voids => 2,
        }
    }
}

/// Betti numbers in dimensions 0, 1 and 2
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BettiNumbers {
    pub beta_0: usize,
    pub beta_1: usize,
    pub beta_2: usize,
}
impl BettiNumbers {
    pub fn new(beta_0: usize, beta_1: usize, beta_2: usize) -> Self {
        Self {
            beta_0,
            beta_1,
            beta_2,
        }
    }
    /// Takes the first 3 Betti numbers, the missing ones are set to 0
    pub fn from_slice(betti: &[usize]) -> Self {
        let get = |k: usize| betti.get(k).copied().unwrap_or_default();
        Self::new(get(0), get(1), get(2))
    }
    pub fn get(&self, dimension: HomologyDimension) -> usize {
        match dimension {
            HomologyDimension::Components => self.beta_0,
            HomologyDimension::Loops => self.beta_1,
            HomologyDimension::Voids => self.beta_2,
        }
    }
    /// Total topological complexity
    pub fn total(&self) -> usize {
        self.beta_0 + self.beta_1 + self.beta_2
    }
    /// Euler characteristic χ = β₀ - β₁ + β₂
    pub fn euler_characteristic(&self) -> i64 {
        self.beta_0 as i64 - self.beta_1 as i64 + self.beta_2 as i64
    }
}
