pub mod context;
pub mod runner;
pub mod spec_model;
