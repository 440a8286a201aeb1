pub mod app;
pub mod config;
pub mod engine;
pub mod error;
pub mod generators;
pub mod logging;
pub mod maze;
pub mod solvers;
