//! Reactive cluster-transport core for a plasma-surface-interaction
//! simulator: defect cluster dynamics (diffusion, advection, trap
//! mutation, reaction kinetics) coupled to event-driven surface motion
//! and bubble bursting on a 1-D spatial grid.
//!
//! This crate is the physics/assembly layer an external time integrator
//! drives through [`assembly::SolverContext`]; it owns no integration
//! loop of its own.

pub mod assembly;
pub mod checkpoint;
pub mod cluster;
pub mod communicator;
pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod flux;
pub mod grid;
pub mod monitors;
pub mod network;
pub mod rate_model;
pub mod reaction;
pub mod species;
pub mod temperature;
pub mod transport;
pub mod trap_mutation;

pub use cluster::{Cluster, ClusterCatalogue, ClusterId};
pub use error::{CoreError, CoreResult};
pub use grid::Grid;
pub use network::Network;
pub use rate_model::ArrheniusRateModel;
pub use species::{Composition, Species};
