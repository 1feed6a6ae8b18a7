pub mod sqlite_booking_repo;
pub mod sqlite_notification_repo;
pub mod sqlite_tour_repo;
pub mod sqlite_user_repo;
