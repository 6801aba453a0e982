pub mod booking;
pub mod lifecycle;
pub mod notification;
pub mod rules;

pub use booking::AppointmentService;
pub use lifecycle::AppointmentLifecycleService;
pub use notification::NotificationService;
pub use rules::BookingRules;
