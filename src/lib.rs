pub mod analysis;
pub mod error;
pub mod export;
pub mod flow;
pub mod graph;
pub mod scenario;
pub mod simulation;
