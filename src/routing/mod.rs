//! Routing towards the base station.
//!
//! Computes deterministic shortest-path routes and derives delivery
//! metrics from them.

pub mod path;
pub mod evaluator;

pub use path::{shortest_path, Route, RouteTable};
pub use evaluator::{evaluate, evaluate_routes, EvaluationResult};
