//! Code shared between the FinTrack clients

#![warn(unused_crate_dependencies)]

pub mod company;
pub mod const_config;
pub mod errors;
mod macros;
pub mod req_args;
pub mod user;

#[cfg(not(target_arch = "wasm32"))]
pub mod telemetry;
