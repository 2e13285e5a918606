//! Reaction graph: production/combination/dissociation/emission (§4.B).
//!
//! Two elementary reaction shapes cover all four role names from the
//! spec's vocabulary (see `DESIGN.md` for the resolved ambiguity):
//!
//! - **Bimolecular** `A + B -> C`: contributes `+production` to `C` and
//!   `-combination` (the same term) to `A` and `B`.
//! - **Unary** `C -> A + B` (one-step dissociation, possibly with one
//!   fragment union being an untracked emitted species): contributes
//!   `+dissociation` to each product and `-emission` (the same term) to
//!   the parent `C`.
//!
//! Both shapes carry an optional [`MomentCoupling`] tensor for the case
//! where any participant is a super cluster.

mod graph;
mod moment_coupling;

pub use graph::ReactionGraph;
pub use moment_coupling::MomentCoupling;

use smallvec::SmallVec;

use crate::cluster::ClusterId;

/// One elementary reaction between network clusters.
#[derive(Clone, Debug)]
pub enum Reaction {
  /// `a + b -> product`, rate `k`.
  Bimolecular {
    a: ClusterId,
    b: ClusterId,
    product: ClusterId,
    k: f64,
    coupling: Option<MomentCoupling>,
  },
  /// `parent -> products[..]` (1 or 2 tracked fragments; a fragment that
  /// leaves the tracked species set is simply absent from `products`),
  /// rate `k`.
  Unary {
    parent: ClusterId,
    products: SmallVec<[ClusterId; 2]>,
    k: f64,
    coupling: Option<MomentCoupling>,
  },
}

impl Reaction {
  pub fn rate(&self) -> f64 {
    match self {
      Reaction::Bimolecular { k, .. } => *k,
      Reaction::Unary { k, .. } => *k,
    }
  }

  pub fn set_rate(&mut self, new_k: f64) {
    match self {
      Reaction::Bimolecular { k, .. } => *k = new_k,
      Reaction::Unary { k, .. } => *k = new_k,
    }
  }

  /// Every cluster id this reaction reads from or writes to.
  pub fn participants(&self) -> SmallVec<[ClusterId; 4]> {
    match self {
      Reaction::Bimolecular { a, b, product, .. } => {
        SmallVec::from_vec(vec![*a, *b, *product])
      }
      Reaction::Unary {
        parent, products, ..
      } => {
        let mut v = SmallVec::new();
        v.push(*parent);
        v.extend(products.iter().copied());
        v
      }
    }
  }
}
