use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::json;
use tracing::warn;

use crate::domain::models::{
    booking::{Booking, BookingSource, BookingStatus, CancellationRole},
    notification::{NewNotification, Notification, NotificationKind},
    tour::Tour,
    user::UserRole,
};
use crate::domain::ports::{NotificationSink, TourRepository};

/// Builds and delivers the per-role notification set for booking lifecycle
/// events. Fire-and-forget: delivery failures are logged and never surface
/// to the caller, since the state change has already been committed.
pub struct NotificationFanout {
    tour_repo: Arc<dyn TourRepository>,
    sink: Arc<dyn NotificationSink>,
}

pub fn booking_summary(title: &str, travel_date: NaiveDate, pax: i64, start_time: Option<&str>) -> String {
    let base = format!("{} · {} pax · {}", title, pax, travel_date.format("%d %b %Y"));
    match start_time {
        Some(time) => format!("{} · {}", base, time),
        None => base,
    }
}

pub fn cancellation_message(summary: &str, role: CancellationRole, reason: Option<&str>) -> String {
    let reason_label = reason
        .map(|r| format!(" • Reason: {}", r))
        .unwrap_or_default();
    format!("Booking {} cancelled by {}{}.", summary, role.label(), reason_label)
}

fn status_label(status: BookingStatus) -> String {
    status.as_str().replace('_', " ").to_lowercase()
}

impl NotificationFanout {
    pub fn new(tour_repo: Arc<dyn TourRepository>, sink: Arc<dyn NotificationSink>) -> Self {
        Self { tour_repo, sink }
    }

    pub async fn notify_creation(&self, booking: &Booking, tour: &Tour) {
        let summary = booking_summary(
            &tour.title,
            booking.travel_date,
            booking.pax_total(),
            booking.start_time.as_deref(),
        );

        self.deliver(NewNotification {
            kind: NotificationKind::AdminBookingCreated,
            role: UserRole::Admin,
            recipient_user_id: None,
            title: "New booking received".to_string(),
            message: format!("Booking for {}.", summary),
            booking_id: Some(booking.id.clone()),
            metadata: Some(json!({ "tourId": tour.id, "pax": booking.pax_total() })),
        })
        .await;

        if let Some(supplier_id) = &tour.supplier_user_id {
            self.deliver(NewNotification {
                kind: NotificationKind::SupplierBookingCreated,
                role: UserRole::Supplier,
                recipient_user_id: Some(supplier_id.clone()),
                title: format!("New booking in {}", tour.title),
                message: format!("You have a new booking for {}.", summary),
                booking_id: Some(booking.id.clone()),
                metadata: Some(json!({ "tourId": tour.id })),
            })
            .await;
        }
    }

    pub async fn notify_cancellation(&self, booking: &Booking, acting_role: CancellationRole, reason: Option<&str>) {
        let Some(tour) = self.resolve_tour(&booking.tour_id).await else {
            return;
        };
        let summary = booking_summary(
            &tour.title,
            booking.travel_date,
            booking.pax_total(),
            booking.start_time.as_deref(),
        );
        let reason_suffix = reason.map(|r| format!(" (reason: {})", r)).unwrap_or_default();

        self.deliver(NewNotification {
            kind: NotificationKind::AdminBookingCancelled,
            role: UserRole::Admin,
            recipient_user_id: None,
            title: "Booking cancelled".to_string(),
            message: cancellation_message(&summary, acting_role, reason),
            booking_id: Some(booking.id.clone()),
            metadata: Some(json!({ "tourId": tour.id, "reason": reason })),
        })
        .await;

        if let Some(supplier_id) = &tour.supplier_user_id {
            self.deliver(NewNotification {
                kind: NotificationKind::SupplierBookingCancelled,
                role: UserRole::Supplier,
                recipient_user_id: Some(supplier_id.clone()),
                title: format!("Booking cancelled in {}", tour.title),
                message: format!("Booking {} was cancelled{}.", summary, reason_suffix),
                booking_id: Some(booking.id.clone()),
                metadata: Some(json!({ "tourId": tour.id })),
            })
            .await;
        }

        if booking.source == BookingSource::Agency || acting_role == CancellationRole::Agency {
            self.deliver(NewNotification {
                kind: NotificationKind::AgencyBookingCancelled,
                role: UserRole::Agency,
                recipient_user_id: None,
                title: "Booking cancelled".to_string(),
                message: format!("Your booking {} was cancelled{}.", summary, reason_suffix),
                booking_id: Some(booking.id.clone()),
                metadata: Some(json!({ "tourId": tour.id })),
            })
            .await;
        }
    }

    /// Pending cancellation requests are only an admin concern; the
    /// stakeholder fan-out waits for the final CANCELLED transition.
    pub async fn notify_cancellation_requested(&self, booking: &Booking, acting_role: CancellationRole, reason: &str) {
        let Some(tour) = self.resolve_tour(&booking.tour_id).await else {
            return;
        };
        let summary = booking_summary(
            &tour.title,
            booking.travel_date,
            booking.pax_total(),
            booking.start_time.as_deref(),
        );

        self.deliver(NewNotification {
            kind: NotificationKind::AdminCancellationRequested,
            role: UserRole::Admin,
            recipient_user_id: None,
            title: "Cancellation requested".to_string(),
            message: format!(
                "{} requested cancellation of {} • Reason: {}.",
                acting_role.label(),
                summary,
                reason
            ),
            booking_id: Some(booking.id.clone()),
            metadata: Some(json!({ "tourId": tour.id, "reason": reason })),
        })
        .await;
    }

    pub async fn notify_modification(&self, booking: &Booking, status: BookingStatus) {
        let Some(tour) = self.resolve_tour(&booking.tour_id).await else {
            return;
        };
        let summary = booking_summary(
            &tour.title,
            booking.travel_date,
            booking.pax_total(),
            booking.start_time.as_deref(),
        );
        let label = status_label(status);

        self.deliver(NewNotification {
            kind: NotificationKind::AdminBookingModified,
            role: UserRole::Admin,
            recipient_user_id: None,
            title: "Booking updated".to_string(),
            message: format!("Booking {} changed to {}.", summary, label),
            booking_id: Some(booking.id.clone()),
            metadata: Some(json!({ "tourId": tour.id, "status": status.as_str() })),
        })
        .await;

        if let Some(supplier_id) = &tour.supplier_user_id {
            self.deliver(NewNotification {
                kind: NotificationKind::SupplierBookingModified,
                role: UserRole::Supplier,
                recipient_user_id: Some(supplier_id.clone()),
                title: format!("Booking modified in {}", tour.title),
                message: format!("Booking {} is now {}.", summary, label),
                booking_id: Some(booking.id.clone()),
                metadata: Some(json!({ "tourId": tour.id, "status": status.as_str() })),
            })
            .await;
        }

        if booking.source == BookingSource::Agency {
            self.deliver(NewNotification {
                kind: NotificationKind::AgencyBookingModified,
                role: UserRole::Agency,
                recipient_user_id: None,
                title: "Booking modified".to_string(),
                message: format!("Your booking {} is now {}.", summary, label),
                booking_id: Some(booking.id.clone()),
                metadata: Some(json!({ "tourId": tour.id, "status": status.as_str() })),
            })
            .await;
        }
    }

    async fn resolve_tour(&self, tour_id: &str) -> Option<Tour> {
        match self.tour_repo.find_by_id(tour_id).await {
            Ok(Some(tour)) => Some(tour),
            Ok(None) => {
                warn!("Notification skipped: tour {} no longer exists", tour_id);
                None
            }
            Err(e) => {
                warn!("Notification skipped: failed to resolve tour {}: {}", tour_id, e);
                None
            }
        }
    }

    async fn deliver(&self, params: NewNotification) {
        let notification = Notification::from_new(params);
        if let Err(e) = self.sink.send(&notification).await {
            warn!(
                "Notification delivery failed (kind {:?}, booking {:?}): {}",
                notification.kind, notification.booking_id, e
            );
        }
    }
}
