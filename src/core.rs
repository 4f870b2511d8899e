pub mod calendar;
pub mod demand;
pub mod error;
#[cfg(test)]
pub mod fixtures;
pub mod interval;
pub mod period;
pub mod plan;
pub mod profile;
pub mod rate;
pub mod simulator;
pub mod time;
pub mod window;
