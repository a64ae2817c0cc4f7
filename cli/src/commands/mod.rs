pub mod check;
pub mod cli;
pub mod request;
