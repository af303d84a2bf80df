//! Backend del marketplace de alquiler de vehículos
//! 
//! API REST de reservas, vehículos, usuarios y reportes, más un cliente
//! HTTP tipado para consumirla.

pub mod client;
pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod state;
pub mod utils;

pub use routes::create_app_router;
pub use state::AppState;
