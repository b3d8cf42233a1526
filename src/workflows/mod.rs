pub mod audit;
pub mod snapshot;
