pub mod client;
pub mod payload;

pub use client::{Backend, HttpBackend};
