//! DTOs de la API
//! 
//! Formas de request/response en JSON (camelCase) y el sobre común
//! `ApiResponse`.

pub mod booking_dto;
pub mod common;
pub mod report_dto;
pub mod vehicle_dto;

pub use common::ApiResponse;
