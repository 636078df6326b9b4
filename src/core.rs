pub mod calculator;
pub mod catalog;
pub mod classifier;
pub mod comparison;
pub mod error;
pub mod plan;
pub mod policy;
pub mod rate;
pub mod reading;
pub mod resolver;
pub mod schedule;
pub mod source;
pub mod timeline;
