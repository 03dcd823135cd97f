pub mod distribution;
pub mod generator;

pub use distribution::{AmountDistribution, EqualShares};
pub use generator::ScheduleGenerator;
