pub mod actions;
pub mod identity;
pub mod registry;
pub mod scanner;
