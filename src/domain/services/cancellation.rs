use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::domain::models::booking::{Booking, BookingStatus, CancellationRole};
use crate::domain::ports::BookingRepository;
use crate::domain::services::cancellation_policy::CancellationPolicy;
use crate::domain::services::notification_fanout::NotificationFanout;
use crate::error::AppError;

/// Role-gated booking cancellation state machine.
///
/// Paths: direct cancel (admin always; supplier/agency outside the approval
/// window), request + admin approval inside the window. `CANCELLED` is
/// terminal; the repository enforces that guard atomically and this service
/// turns a rejected write into a typed error. Notifications fire only after
/// the transition has been committed.
pub struct CancellationService {
    booking_repo: Arc<dyn BookingRepository>,
    fanout: Arc<NotificationFanout>,
    policy: CancellationPolicy,
}

impl CancellationService {
    pub fn new(
        booking_repo: Arc<dyn BookingRepository>,
        fanout: Arc<NotificationFanout>,
        policy: CancellationPolicy,
    ) -> Self {
        Self {
            booking_repo,
            fanout,
            policy,
        }
    }

    pub async fn admin_cancel(&self, booking_id: &str, reason: &str) -> Result<(), AppError> {
        let reason = require_reason(reason)?;
        let booking = self.load(booking_id).await?;

        let cancelled = self
            .apply(&booking, BookingStatus::Cancelled, CancellationRole::Admin, Some(reason))
            .await?;

        info!("Booking {} cancelled by admin", cancelled.id);
        self.fanout
            .notify_cancellation(&cancelled, CancellationRole::Admin, Some(reason))
            .await;
        Ok(())
    }

    /// Finalizes a pending request. The requesting role and its reason are
    /// preserved; the admin only signs off.
    pub async fn admin_approve_cancellation(&self, booking_id: &str) -> Result<(), AppError> {
        let booking = self.load(booking_id).await?;

        if booking.status != BookingStatus::CancellationRequested {
            return Err(AppError::InvalidState(
                "Booking has no pending cancellation request".into(),
            ));
        }
        let requester = booking.cancellation_by_role.ok_or_else(|| {
            AppError::InternalWithMsg(format!("Booking {} lost its requester role", booking.id))
        })?;

        let cancelled = self
            .apply(&booking, BookingStatus::Cancelled, requester, None)
            .await?;

        info!("Cancellation request for booking {} approved", cancelled.id);
        self.fanout
            .notify_cancellation(&cancelled, requester, cancelled.cancellation_reason.as_deref())
            .await;
        Ok(())
    }

    pub async fn supplier_cancel(&self, booking_id: &str, reason: &str) -> Result<(), AppError> {
        self.direct_cancel(booking_id, reason, CancellationRole::Supplier).await
    }

    pub async fn supplier_request_cancellation(&self, booking_id: &str, reason: &str) -> Result<(), AppError> {
        self.request_cancellation(booking_id, reason, CancellationRole::Supplier).await
    }

    pub async fn agency_cancel(&self, booking_id: &str, reason: &str) -> Result<(), AppError> {
        self.direct_cancel(booking_id, reason, CancellationRole::Agency).await
    }

    pub async fn agency_request_cancellation(&self, booking_id: &str, reason: &str) -> Result<(), AppError> {
        self.request_cancellation(booking_id, reason, CancellationRole::Agency).await
    }

    /// Admin status override for the non-cancellation transitions
    /// (payment confirmed manually, tour completed).
    pub async fn admin_update_status(&self, booking_id: &str, status: BookingStatus) -> Result<(), AppError> {
        if !matches!(status, BookingStatus::Confirmed | BookingStatus::Completed) {
            return Err(AppError::Validation(
                "Status must be CONFIRMED or COMPLETED; cancellations go through the cancel operations".into(),
            ));
        }

        let booking = self.load(booking_id).await?;
        if booking.status == BookingStatus::Cancelled {
            return Err(AppError::InvalidState("Booking is already cancelled".into()));
        }

        let updated = self
            .booking_repo
            .update_status(booking_id, status)
            .await?
            .ok_or_else(|| AppError::InvalidState("Booking is already cancelled".into()))?;

        info!("Booking {} status set to {}", updated.id, status.as_str());
        self.fanout.notify_modification(&updated, status).await;
        Ok(())
    }

    async fn direct_cancel(
        &self,
        booking_id: &str,
        reason: &str,
        role: CancellationRole,
    ) -> Result<(), AppError> {
        let reason = require_reason(reason)?;
        let booking = self.load(booking_id).await?;

        // Policy is re-checked against the booking's current travel date at
        // call time, never a cached value.
        if self.policy.requires_approval(booking.travel_date, Utc::now()) {
            return Err(AppError::PolicyViolation(
                "Travel date is too close; submit a cancellation request for admin approval".into(),
            ));
        }

        let cancelled = self
            .apply(&booking, BookingStatus::Cancelled, role, Some(reason))
            .await?;

        info!("Booking {} cancelled by {}", cancelled.id, role.label());
        self.fanout.notify_cancellation(&cancelled, role, Some(reason)).await;
        Ok(())
    }

    async fn request_cancellation(
        &self,
        booking_id: &str,
        reason: &str,
        role: CancellationRole,
    ) -> Result<(), AppError> {
        let reason = require_reason(reason)?;
        let booking = self.load(booking_id).await?;

        let updated = self
            .apply(&booking, BookingStatus::CancellationRequested, role, Some(reason))
            .await?;

        info!("Cancellation of booking {} requested by {}", updated.id, role.label());
        // Only admins hear about pending requests; the stakeholder fan-out
        // fires when the request is approved.
        self.fanout.notify_cancellation_requested(&updated, role, reason).await;
        Ok(())
    }

    async fn load(&self, booking_id: &str) -> Result<Booking, AppError> {
        self.booking_repo
            .find_by_id(booking_id)
            .await?
            .ok_or(AppError::NotFound("Booking not found".into()))
    }

    async fn apply(
        &self,
        booking: &Booking,
        status: BookingStatus,
        role: CancellationRole,
        reason: Option<&str>,
    ) -> Result<Booking, AppError> {
        if booking.status == BookingStatus::Cancelled {
            return Err(AppError::InvalidState("Booking is already cancelled".into()));
        }

        // The guarded write also catches a concurrent cancellation that
        // landed between our read and this update.
        self.booking_repo
            .apply_cancellation(&booking.id, status, role, reason, Utc::now())
            .await?
            .ok_or_else(|| AppError::InvalidState("Booking is already cancelled".into()))
    }
}

fn require_reason(reason: &str) -> Result<&str, AppError> {
    let trimmed = reason.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation("A cancellation reason is required".into()));
    }
    Ok(trimmed)
}
