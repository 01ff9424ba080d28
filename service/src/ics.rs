//! [iCalendar] rendering of [`Reservation`]s for notification emails.
//!
//! [iCalendar]: https://datatracker.ietf.org/doc/html/rfc5545

use crate::domain::{location, reservation, resource, Reservation};

/// Renders the given [`Reservation`] as an [iCalendar] object with a single
/// all-day `VEVENT`.
///
/// The `VEVENT` is identified by the [`Reservation`]'s ID, so re-sending the
/// same [`Reservation`] updates the event in the recipient's calendar
/// instead of duplicating it. The time slot of a half-day [`Reservation`] is
/// named in the `SUMMARY`, as all-day events carry no time of day.
///
/// [iCalendar]: https://datatracker.ietf.org/doc/html/rfc5545
#[expect(clippy::missing_panics_doc, reason = "infallible")]
#[must_use]
pub fn render(
    reservation: &Reservation,
    resource: &resource::Name,
    location: &location::Name,
) -> String {
    use reservation::{Slot, Status};

    // `DTEND` of an all-day event is exclusive.
    let day_after = reservation.date.next().expect("`Date` overflow");

    let summary = match reservation.span.slot() {
        None => format!("{resource} at {location}"),
        Some(Slot::Morning) => format!("{resource} at {location} (morning)"),
        Some(Slot::Afternoon) => {
            format!("{resource} at {location} (afternoon)")
        }
    };
    let status = match reservation.status {
        Status::Confirmed => "CONFIRMED",
        Status::Cancelled => "CANCELLED",
    };

    let mut out = String::new();
    fold_into(&mut out, "BEGIN:VCALENDAR");
    fold_into(&mut out, "VERSION:2.0");
    fold_into(&mut out, "PRODID:-//Coworking//Booking//EN");
    fold_into(&mut out, "CALSCALE:GREGORIAN");
    fold_into(&mut out, "METHOD:PUBLISH");
    fold_into(&mut out, "BEGIN:VEVENT");
    fold_into(&mut out, &format!("UID:{}", reservation.id));
    fold_into(
        &mut out,
        &format!("DTSTAMP:{}", reservation.created_at.to_iso8601_basic()),
    );
    fold_into(
        &mut out,
        &format!(
            "DTSTART;VALUE=DATE:{}",
            reservation.date.to_iso8601_basic(),
        ),
    );
    fold_into(
        &mut out,
        &format!("DTEND;VALUE=DATE:{}", day_after.to_iso8601_basic()),
    );
    fold_into(&mut out, &format!("SUMMARY:{}", escape(&summary)));
    fold_into(&mut out, &format!("LOCATION:{}", escape(location.as_ref())));
    fold_into(&mut out, &format!("STATUS:{status}"));
    fold_into(&mut out, "END:VEVENT");
    fold_into(&mut out, "END:VCALENDAR");
    out
}

/// Escapes the given `text` as an [iCalendar] `TEXT` value.
///
/// [iCalendar]: https://datatracker.ietf.org/doc/html/rfc5545#section-3.3.11
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            ';' => escaped.push_str("\\;"),
            ',' => escaped.push_str("\\,"),
            '\n' => escaped.push_str("\\n"),
            '\r' => {}
            c => escaped.push(c),
        }
    }
    escaped
}

/// Appends the given content `line` to `out` as CRLF-terminated physical
/// lines of at most 75 octets, folded with a leading space as [iCalendar]
/// requires.
///
/// [iCalendar]: https://datatracker.ietf.org/doc/html/rfc5545#section-3.1
fn fold_into(out: &mut String, line: &str) {
    /// Maximum octets of a physical line, the fold marker included.
    const LIMIT: usize = 75;

    let mut taken = 0;
    for ch in line.chars() {
        let octets = ch.len_utf8();
        if taken + octets > LIMIT {
            out.push_str("\r\n ");
            taken = 1;
        }
        out.push(ch);
        taken += octets;
    }
    out.push_str("\r\n");
}

#[cfg(test)]
mod spec {
    use common::{Date, DateTime, Entries};

    use super::{escape, fold_into, render};
    use crate::domain::{
        contract, customer, location,
        reservation::{self, Slot, Span, Status},
        resource, Reservation,
    };

    fn reservation(span: Span) -> Reservation {
        Reservation {
            id: "8a6e0804-2bd0-4672-b79d-d97027f9071a".parse().unwrap(),
            resource_id: resource::Id::new(),
            contract_id: contract::Id::new(),
            customer_id: customer::Id::new(),
            date: Date::from_iso8601("2024-06-10").unwrap().coerce(),
            span,
            entries: Entries::ONE,
            status: Status::Confirmed,
            is_archived: false,
            created_at: DateTime::from_rfc3339("2024-06-01T08:30:00Z")
                .unwrap()
                .coerce(),
            cancelled_at: None,
        }
    }

    #[test]
    fn renders_an_all_day_event() {
        let rendered = render(
            &reservation(Span::FullDay),
            &resource::Name::new("Desk A").unwrap(),
            &location::Name::new("Riverside Hub").unwrap(),
        );

        assert_eq!(
            rendered,
            "BEGIN:VCALENDAR\r\n\
             VERSION:2.0\r\n\
             PRODID:-//Coworking//Booking//EN\r\n\
             CALSCALE:GREGORIAN\r\n\
             METHOD:PUBLISH\r\n\
             BEGIN:VEVENT\r\n\
             UID:8a6e0804-2bd0-4672-b79d-d97027f9071a\r\n\
             DTSTAMP:20240601T083000Z\r\n\
             DTSTART;VALUE=DATE:20240610\r\n\
             DTEND;VALUE=DATE:20240611\r\n\
             SUMMARY:Desk A at Riverside Hub\r\n\
             LOCATION:Riverside Hub\r\n\
             STATUS:CONFIRMED\r\n\
             END:VEVENT\r\n\
             END:VCALENDAR\r\n",
        );
    }

    #[test]
    fn names_the_slot_of_a_half_day() {
        let rendered = render(
            &reservation(Span::HalfDay(Slot::Morning)),
            &resource::Name::new("Desk A").unwrap(),
            &location::Name::new("Riverside Hub").unwrap(),
        );

        assert!(
            rendered.contains("SUMMARY:Desk A at Riverside Hub (morning)"),
        );
    }

    #[test]
    fn cancelled_status_is_rendered() {
        let mut r = reservation(Span::FullDay);
        r.cancel(DateTime::now().coerce());

        let rendered = render(
            &r,
            &resource::Name::new("Desk A").unwrap(),
            &location::Name::new("Riverside Hub").unwrap(),
        );

        assert!(rendered.contains("STATUS:CANCELLED\r\n"));
    }

    #[test]
    fn escapes_text_values() {
        assert_eq!(
            escape("Desks; great, cheap\nback\\slash"),
            "Desks\\; great\\, cheap\\nback\\\\slash",
        );
    }

    #[test]
    fn folds_long_lines_at_75_octets() {
        let mut out = String::new();
        fold_into(&mut out, &"x".repeat(160));

        for physical in out.split("\r\n").filter(|l| !l.is_empty()) {
            assert!(physical.len() <= 75, "line of {}", physical.len());
        }
        assert_eq!(
            out.replace("\r\n ", "").trim_end_matches("\r\n"),
            "x".repeat(160),
        );
    }

    #[test]
    fn short_lines_are_not_folded() {
        let mut out = String::new();
        fold_into(&mut out, "SUMMARY:short");
        assert_eq!(out, "SUMMARY:short\r\n");
    }

    #[test]
    fn folding_respects_char_boundaries() {
        let mut out = String::new();
        // 2-octet characters cannot land on the 75-octet edge evenly.
        fold_into(&mut out, &"é".repeat(80));

        for physical in out.split("\r\n").filter(|l| !l.is_empty()) {
            assert!(physical.len() <= 75);
        }
        assert_eq!(
            out.replace("\r\n ", "").trim_end_matches("\r\n"),
            "é".repeat(80),
        );
    }
}
