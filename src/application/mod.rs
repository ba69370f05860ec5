pub mod binders;
pub mod dto;
pub mod errors;
pub mod gateway;
pub mod methods;
pub mod ports;
pub mod validation;
