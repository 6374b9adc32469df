pub mod envelope;
pub mod forms;
pub mod health;
pub mod response;
pub mod validation;
