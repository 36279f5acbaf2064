#![forbid(unsafe_code)]

pub mod studio_cli;
