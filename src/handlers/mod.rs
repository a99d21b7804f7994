// handlers/mod.rs - HTTP handlers, one module per resource
//
// Handlers parse path and body input, call a service, and wrap the result
// in the response envelope. No authentication is applied at this layer.

pub mod admin;
pub mod cases;
pub mod departments;
pub mod email_reminders;
pub mod mail;
pub mod root;
pub mod statistics;
pub mod sub_departments;
pub mod utils;
