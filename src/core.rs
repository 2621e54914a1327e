pub mod batch;
pub mod case;
pub mod constraint;
pub mod evaluation;
#[cfg(test)]
pub mod fixtures;
pub mod plan;
pub mod rejection;
pub mod route;
pub mod simulator;
