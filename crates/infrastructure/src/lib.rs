//! hostsdns infrastructure layer
pub mod dns;
pub mod hosts;
