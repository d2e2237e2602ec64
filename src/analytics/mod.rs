pub mod aggregate;
pub mod calendar;
pub mod mood;
pub mod normalize;
pub mod report;
