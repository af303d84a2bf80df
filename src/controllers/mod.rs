//! Controladores
//! 
//! Lógica de negocio por recurso: reglas de estado, propiedad
//! y generación de reportes.

pub mod booking_controller;
pub mod report_controller;
pub mod user_controller;
pub mod vehicle_controller;

pub use booking_controller::BookingController;
pub use report_controller::ReportController;
pub use user_controller::UserController;
pub use vehicle_controller::VehicleController;
