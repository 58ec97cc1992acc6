pub mod cpu_features;
pub mod log_setup;
pub mod parallel;
