//! Physical constants shared across rate/energy formulas.

/// Boltzmann constant, eV/K.
pub const K_B: f64 = 8.617_333_262e-5;

/// Attempt (Debye) frequency used as the dissociation rate prefactor, Hz.
pub const ATTEMPT_FREQUENCY: f64 = 1.0e13;

#[cfg(test)]
#[path = "constants_test.rs"]
mod constants_test;
