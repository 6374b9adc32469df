pub mod health;
pub mod transport;
pub mod webhook;
