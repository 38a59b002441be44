//! Routing attacks injected into a running topology.

pub mod sinkhole;

pub use sinkhole::{choose_attacker, inject_sinkhole, SINKHOLE_ADVERTISED_COST};
