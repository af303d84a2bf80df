//! Máquina de estados de las reservas
//!
//! Única fuente de verdad para las transiciones de estado de una reserva.
//! La usan el controlador del servidor (antes de persistir), el cliente HTTP
//! (antes de enviar) y los tests.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::Type;
use thiserror::Error;

/// Estado de la reserva - mapea al ENUM booking_status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "booking_status", rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    PaymentPending,
    Paid,
    Active,
    Completed,
    Cancelled,
    Rejected,
    Refunded,
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 9] = [
        BookingStatus::Pending,
        BookingStatus::Confirmed,
        BookingStatus::PaymentPending,
        BookingStatus::Paid,
        BookingStatus::Active,
        BookingStatus::Completed,
        BookingStatus::Cancelled,
        BookingStatus::Rejected,
        BookingStatus::Refunded,
    ];

    /// Estados a los que se puede pasar desde `self`
    pub fn next_allowed(self) -> &'static [BookingStatus] {
        use BookingStatus::*;

        match self {
            Pending => &[Confirmed, Rejected, Cancelled],
            Confirmed => &[PaymentPending, Paid, Cancelled],
            PaymentPending => &[Paid, Cancelled],
            Paid => &[Active, Cancelled],
            Active => &[Completed, Cancelled],
            Completed => &[Refunded],
            Cancelled => &[Refunded],
            Rejected | Refunded => &[],
        }
    }

    pub fn can_transition_to(self, next: BookingStatus) -> bool {
        self.next_allowed().contains(&next)
    }

    /// Rechazar o cancelar exige un motivo no vacío
    pub fn requires_reason(self) -> bool {
        matches!(self, BookingStatus::Rejected | BookingStatus::Cancelled)
    }

    pub fn is_terminal(self) -> bool {
        self.next_allowed().is_empty()
    }

    /// Estados que cuentan como ingreso en los reportes
    pub fn counts_as_revenue(self) -> bool {
        matches!(
            self,
            BookingStatus::Paid | BookingStatus::Active | BookingStatus::Completed
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::PaymentPending => "payment_pending",
            BookingStatus::Paid => "paid",
            BookingStatus::Active => "active",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Rejected => "rejected",
            BookingStatus::Refunded => "refunded",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown booking status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for BookingStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BookingStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s.trim())
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// Motivos por los que un cambio de estado no se acepta
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("booking is already '{0}'")]
    Unchanged(BookingStatus),

    #[error("cannot move a booking from '{from}' to '{to}'")]
    NotAllowed { from: BookingStatus, to: BookingStatus },

    #[error("a reason is required to move a booking to '{0}'")]
    ReasonRequired(BookingStatus),
}

/// Validar un cambio de estado contra la tabla de transiciones
pub fn validate_status_change(
    current: BookingStatus,
    new: BookingStatus,
    reason: Option<&str>,
) -> Result<(), TransitionError> {
    if current == new {
        return Err(TransitionError::Unchanged(current));
    }

    if !current.can_transition_to(new) {
        return Err(TransitionError::NotAllowed { from: current, to: new });
    }

    let has_reason = reason.map(|r| !r.trim().is_empty()).unwrap_or(false);
    if new.requires_reason() && !has_reason {
        return Err(TransitionError::ReasonRequired(new));
    }

    Ok(())
}

/// Cambio de estado ya validado, listo para persistir o enviar
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusChange {
    pub from: BookingStatus,
    pub to: BookingStatus,
    pub reason: Option<String>,
    pub notes: Option<String>,
}

impl StatusChange {
    /// Construir el cambio. Si no hay notas, el motivo se copia a las notas.
    pub fn new(
        from: BookingStatus,
        to: BookingStatus,
        reason: Option<String>,
        notes: Option<String>,
    ) -> Result<Self, TransitionError> {
        let reason = non_blank(reason);
        let notes = non_blank(notes).or_else(|| reason.clone());

        validate_status_change(from, to, reason.as_deref())?;

        Ok(Self { from, to, reason, notes })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
