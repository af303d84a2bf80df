//! Modelos del sistema
//! 
//! Este módulo contiene los modelos de dominio del marketplace: reservas,
//! su máquina de estados, usuarios, vehículos y reportes.

pub mod booking;
pub mod booking_status;
pub mod report;
pub mod user;
pub mod vehicle;

pub use booking::{Booking, BookingQuery, BookingStatusHistory};
pub use booking_status::{BookingStatus, StatusChange, TransitionError};
pub use user::{UserProfile, UserRole};
pub use vehicle::Vehicle;
