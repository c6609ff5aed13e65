pub mod admin;
pub mod shell;
pub mod vote;
