pub mod handlers;
pub mod router;
pub mod models;
pub mod repository;
pub mod services;

pub use models::*;
pub use repository::{
    AppointmentRepository, InMemoryAppointmentRepository, InMemoryNotificationRepository,
    NotificationRepository, SupabaseAppointmentRepository, SupabaseNotificationRepository,
};
pub use services::{AppointmentService, BookingRules, NotificationService};
