#![forbid(unsafe_code)]

pub mod ownership_gate;
