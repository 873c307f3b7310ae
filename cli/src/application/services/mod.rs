//! Use-case services.

pub mod compile_service;
