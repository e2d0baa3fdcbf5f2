pub mod api;
pub mod app;
pub mod domain;
pub mod dto;
pub mod error;
pub mod infra;
pub mod oas;
pub mod services;
