// talos_core/src/lib.rs

// This file defines the public modules of your library.
pub mod config;
pub mod error;
pub mod models;
pub mod prelude;
pub mod sim;
pub mod state;
pub mod types;
pub mod utils;
