// LogLens - platform/mod.rs
//
// Platform abstraction layer: filesystem, configuration, network.
// Dependencies: core (types only), util, directories, reqwest.
// Must NOT depend on: app.

pub mod analysis;
pub mod config;
pub mod fs;
