pub mod action;
pub mod conditions;
pub mod damage;
pub mod engine;
pub mod state;
pub mod stats;

#[cfg(test)]
mod tests;
