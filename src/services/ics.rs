//! iCalendar export (RFC 5545)
//!
//! Produces the downloadable calendar document for a planned tour: one
//! VCALENDAR with one VEVENT per showing. Line structure is CRLF-joined
//! and timestamps are UTC — external calendar readers are picky about
//! both, so the output format is treated as byte-exact.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Identifies this worker as the calendar producer.
pub const DEFAULT_PROD_ID: &str = "-//showings-worker//EN";

/// One timed calendar event.
#[derive(Debug, Clone)]
pub struct CalendarEvent {
    /// Stable identifier; synthesized when absent.
    pub uid: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
}

/// Format an instant as an iCalendar UTC timestamp (`YYYYMMDDThhmmssZ`).
pub fn format_ical_instant(t: DateTime<Utc>) -> String {
    t.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Escape text per RFC 5545: backslash, newline, comma, semicolon.
fn escape_text(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('\n', "\\n")
        .replace(',', "\\,")
        .replace(';', "\\;")
}

/// Generate the calendar document for the given events.
///
/// DTSTAMP is the document creation instant, shared by every event.
pub fn generate_ics(events: &[CalendarEvent], prod_id: &str) -> String {
    let mut lines = vec![
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        format!("PRODID:{}", prod_id),
        "CALSCALE:GREGORIAN".to_string(),
        "METHOD:PUBLISH".to_string(),
    ];

    let stamp = format_ical_instant(Utc::now());
    for event in events {
        let uid = event
            .uid
            .clone()
            .unwrap_or_else(|| format!("{}@showings-worker", Uuid::new_v4()));

        lines.push("BEGIN:VEVENT".to_string());
        lines.push(format!("UID:{}", uid));
        lines.push(format!("DTSTAMP:{}", stamp));
        lines.push(format!("DTSTART:{}", format_ical_instant(event.start)));
        lines.push(format!("DTEND:{}", format_ical_instant(event.end)));
        lines.push(format!("SUMMARY:{}", escape_text(&event.title)));
        if let Some(location) = &event.location {
            lines.push(format!("LOCATION:{}", escape_text(location)));
        }
        if let Some(description) = &event.description {
            lines.push(format!("DESCRIPTION:{}", escape_text(description)));
        }
        lines.push("END:VEVENT".to_string());
    }

    lines.push("END:VCALENDAR".to_string());
    lines.join("\r\n")
}
