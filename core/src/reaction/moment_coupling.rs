//! Moment-coupling tensor `a_{αβγ}` for reactions touching a super cluster
//! (§4.B).
//!
//! `coefficients[alpha][beta][gamma]` is the contribution of moment `alpha`
//! of the first participant and moment `beta` of the second participant
//! into moment `gamma` of the super-cluster side of the reaction. For a
//! unary reaction the "second participant" axis collapses to a single
//! dummy index (`beta == 0`).

/// Precomputed `a_{αβγ}` tensor, filled at network construction (§4.B).
#[derive(Clone, Debug)]
pub struct MomentCoupling {
  /// `coefficients[alpha][beta]` is the per-gamma coefficient row.
  coefficients: Vec<Vec<Vec<f64>>>,
}

impl MomentCoupling {
  pub fn new(coefficients: Vec<Vec<Vec<f64>>>) -> Self {
    Self { coefficients }
  }

  /// Uniform `a_{000} = 1`, all else zero — the degenerate coupling for a
  /// reaction between two purely-regular clusters whose product happens to
  /// land inside a super cluster's zeroth moment only.
  pub fn identity() -> Self {
    Self {
      coefficients: vec![vec![vec![1.0]]],
    }
  }

  pub fn num_gamma(&self) -> usize {
    self.coefficients.first().and_then(|row| row.first()).map(|g| g.len()).unwrap_or(0)
  }

  /// Fold `moments_a[alpha] * moments_b[beta]` through the tensor, writing
  /// `rate * sum_{alpha,beta} a_{alpha,beta,gamma} * moments_a[alpha] *
  /// moments_b[beta]` into `out_moments[gamma]` (added, not overwritten).
  pub fn accumulate(&self, rate: f64, moments_a: &[f64], moments_b: &[f64], out_moments: &mut [f64]) {
    for (alpha, row) in self.coefficients.iter().enumerate() {
      let Some(&ma) = moments_a.get(alpha) else {
        continue;
      };
      for (beta, gammas) in row.iter().enumerate() {
        let Some(&mb) = moments_b.get(beta) else {
          continue;
        };
        let weight = rate * ma * mb;
        for (gamma, &coeff) in gammas.iter().enumerate() {
          if let Some(slot) = out_moments.get_mut(gamma) {
            *slot += coeff * weight;
          }
        }
      }
    }
  }
}

#[cfg(test)]
#[path = "moment_coupling_test.rs"]
mod moment_coupling_test;
