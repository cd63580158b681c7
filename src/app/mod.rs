// LogLens - app/mod.rs
//
// Application layer: session state and request orchestration.
// Dependencies: core layer.
// Must NOT depend on: platform specifics.

pub mod session;
