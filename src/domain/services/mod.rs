pub mod auth_service;
pub mod booking_service;
pub mod cancellation;
pub mod cancellation_policy;
pub mod notification_fanout;
