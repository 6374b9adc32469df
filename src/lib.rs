pub mod api;
pub mod clients;
pub mod config;
pub mod controller;
pub mod error;
pub mod models;
pub mod telemetry;
