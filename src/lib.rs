//! rbconnect library
//!
//! This library manages the connection to a Review Board server: the
//! settings record and its validation, credential construction for the REST
//! API and the `rbt` tool, and the save/load lifecycle that keeps secrets in
//! the system keyring and everything else in a plain settings file.

pub mod cli;
pub mod color;
pub mod commands;
pub mod config;
pub mod credentials;
pub mod reviewboard;
pub mod secrets;
