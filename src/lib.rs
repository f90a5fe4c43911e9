pub mod aggregate;
pub mod common;
pub mod errors;
pub mod export;
pub mod generate_commands;
pub mod plan;
pub mod plan_execution;
pub mod sampler;
pub mod synth;
pub mod table_io;
pub mod tables;
