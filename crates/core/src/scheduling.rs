//! Date-range filtering and guest booking rules.

use serde::Deserialize;
use validator::ValidateEmail;

use crate::error::CoreError;
use crate::node::NodeProperties;
use crate::types::Timestamp;

/// Status stamped on every meeting created by a guest booking.
pub const MEETING_STATUS_SCHEDULED: &str = "scheduled";

// ---------------------------------------------------------------------------
// Date ranges
// ---------------------------------------------------------------------------

/// Inclusive `[start, end]` window used by calendar and availability queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct DateRange {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl DateRange {
    /// Build a range, rejecting one that ends before it starts.
    pub fn new(start: Timestamp, end: Timestamp) -> Result<Self, CoreError> {
        if end < start {
            return Err(CoreError::Validation(
                "Range end must not be before range start".to_string(),
            ));
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, at: Timestamp) -> bool {
        self.start <= at && at <= self.end
    }

    /// Whether a node with the given dates is selected by this range.
    ///
    /// A node matches when its start date or its end date lies inside the
    /// range. A node that starts before the range and ends after it touches
    /// neither boundary and is NOT selected. The SQL in the node repository
    /// applies the same rule.
    pub fn selects(&self, start_date: Option<Timestamp>, end_date: Option<Timestamp>) -> bool {
        start_date.is_some_and(|s| self.contains(s)) || end_date.is_some_and(|e| self.contains(e))
    }
}

// ---------------------------------------------------------------------------
// Guest bookings
// ---------------------------------------------------------------------------

/// Validate a guest booking before a meeting node is created for it.
pub fn validate_booking(
    title: &str,
    guest_email: &str,
    start: Timestamp,
    end: Timestamp,
) -> Result<(), CoreError> {
    crate::node::validate_title(title)?;
    if !guest_email.validate_email() {
        return Err(CoreError::Validation(format!(
            "Invalid guest email '{guest_email}'"
        )));
    }
    if end <= start {
        return Err(CoreError::Validation(
            "Booking end must be after its start".to_string(),
        ));
    }
    Ok(())
}

/// Body text of a booked meeting.
pub fn meeting_content(guest_email: &str) -> String {
    format!("Booked by {guest_email}")
}

/// Properties of a booked meeting.
pub fn meeting_properties(guest_email: &str) -> NodeProperties {
    let mut props = NodeProperties::new();
    props.insert("guest_email".into(), guest_email.into());
    props.insert("status".into(), MEETING_STATUS_SCHEDULED.into());
    props
}
