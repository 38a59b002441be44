//! Detection and mitigation stages run after an attack.

pub mod ids;
pub mod mitigation;

pub use ids::{detect, DEFAULT_OUT_DEGREE_THRESHOLD};
pub use mitigation::apply_secure_routing;
