pub mod command;
pub mod inst;
pub mod segment;
