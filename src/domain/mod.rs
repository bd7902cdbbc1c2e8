//! Domain layer: decision types, policy rules and outbound ports.

pub mod entities;
pub mod errors;
pub mod ports;
pub mod services;
pub mod value_objects;
