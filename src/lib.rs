pub mod api;
pub mod challenge;
pub mod cli;
pub mod config;
pub mod db;
pub mod errors;
pub mod gate;
pub mod tracker;
