//! Availability resolution over a prefetched day ledger snapshot.
//!
//! The resolver is a pure decision function: it touches no storage, so the
//! same rules run on the read path (live feedback for booking forms) and on
//! the write path (re-validation inside the booking transaction).

use common::{Date, Entries};
use derive_more::Display;

use crate::domain::{
    location, reservation::Span, resource, schedule::Weekday, Booking,
    Closure, OperatingSchedule, Reservation, Resource,
};
#[cfg(doc)]
use crate::domain::Location;

/// Target a booking request is aimed at.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Target {
    /// One exact [`Resource`].
    Resource(resource::Id),

    /// Any [`Resource`] of the [`resource::Category`] at the [`Location`].
    Category {
        /// Requested [`resource::Category`].
        category: resource::Category,

        /// ID of the [`Location`] to book at.
        location: location::Id,
    },
}

/// Criteria [`Candidate`]s are assembled by: the [`Target`] plus the
/// inclusive date range whose [`Closure`]s and ledger [`Entry`]s the
/// snapshot must cover.
#[derive(Clone, Debug)]
pub struct Window {
    /// [`Target`] to assemble [`Candidate`]s for.
    pub target: Target,

    /// First [`Date`] of interest, inclusive.
    pub starts_on: Date,

    /// Last [`Date`] of interest, inclusive.
    pub ends_on: Date,
}

impl Window {
    /// Creates a new [`Window`] collapsed to a single [`Date`].
    #[must_use]
    pub fn on(target: Target, date: Date) -> Self {
        Self {
            target,
            starts_on: date,
            ends_on: date,
        }
    }
}

/// Single ledger entry occupying a [`Resource`]: a confirmed [`Reservation`]
/// on its date, or a confirmed [`Booking`] weighted as full-day on every
/// covered date.
#[derive(Clone, Copy, Debug)]
pub struct Entry {
    /// [`Span`] of a day this [`Entry`] occupies.
    pub span: Span,

    /// First [`Date`] this [`Entry`] covers, inclusive.
    pub starts_on: Date,

    /// Last [`Date`] this [`Entry`] covers, inclusive.
    pub ends_on: Date,
}

impl Entry {
    /// Indicates whether this [`Entry`] covers the given [`Date`].
    #[must_use]
    pub fn covers(&self, date: Date) -> bool {
        self.starts_on <= date && date <= self.ends_on
    }
}

impl From<&Reservation> for Entry {
    fn from(r: &Reservation) -> Self {
        Self {
            span: r.span,
            starts_on: r.date.coerce(),
            ends_on: r.date.coerce(),
        }
    }
}

impl From<&Booking> for Entry {
    fn from(b: &Booking) -> Self {
        Self {
            span: Span::FullDay,
            starts_on: b.starts_on.coerce(),
            ends_on: b.ends_on.coerce(),
        }
    }
}

/// Snapshot of everything availability of a single [`Resource`] depends on.
///
/// Assembled from bookable [`Resource`]s only: soft-disabled and retired
/// ones never become [`Candidate`]s.
#[derive(Clone, Debug)]
pub struct Candidate {
    /// The [`Resource`] itself.
    pub resource: Resource,

    /// [`Closure`]s overlapping the requested period, location-scoped ones
    /// included.
    pub closures: Vec<Closure>,

    /// Weekly [`OperatingSchedule`] rules of the [`Resource`].
    pub schedule: Vec<OperatingSchedule>,

    /// Confirmed non-archived ledger [`Entry`]s of the [`Resource`]
    /// overlapping the requested period.
    pub entries: Vec<Entry>,
}

impl Candidate {
    /// Returns the reason the given [`Span`] cannot be taken on the given
    /// [`Date`], if any.
    #[must_use]
    pub fn refusal(&self, date: Date, span: Span) -> Option<Refusal> {
        if self.is_closed_on(date) {
            return Some(Refusal::Closed);
        }
        if self.is_closed_weekday(date) {
            return Some(Refusal::ClosedWeekday);
        }
        self.is_fully_booked(date, span).then_some(Refusal::FullyBooked)
    }

    /// Returns the reason a [`Booking`] of the given inclusive date range
    /// cannot be made, if any.
    ///
    /// Every covered [`Date`] must pass closure and conflict checks with a
    /// full-day request. Weekly [`OperatingSchedule`] flags are not applied:
    /// a closed weekday inside the range is a non-operating day rather than
    /// a conflict.
    #[must_use]
    pub fn refusal_for_range(
        &self,
        starts_on: Date,
        ends_on: Date,
    ) -> Option<Refusal> {
        starts_on.through(ends_on).find_map(|date| {
            if self.is_closed_on(date) {
                return Some(Refusal::Closed);
            }
            self.is_fully_booked(date, Span::FullDay)
                .then_some(Refusal::FullyBooked)
        })
    }

    /// Indicates whether a [`Closure`] covers the given [`Date`].
    fn is_closed_on(&self, date: Date) -> bool {
        self.closures
            .iter()
            .any(|c| c.applies_to(&self.resource) && c.covers(date))
    }

    /// Indicates whether the [`OperatingSchedule`] marks the given [`Date`]'s
    /// [`Weekday`] as closed.
    fn is_closed_weekday(&self, date: Date) -> bool {
        let weekday = Weekday::of(date);
        self.schedule.iter().any(|s| {
            s.resource_id == self.resource.id
                && s.weekday == weekday
                && s.is_closed
        })
    }

    /// Applies the conflict rule: indicates whether the ledger [`Entry`]s on
    /// the given [`Date`] leave no room for the given [`Span`].
    fn is_fully_booked(&self, date: Date, span: Span) -> bool {
        let entries = self.entries.iter().filter(|e| e.covers(date));

        match span {
            Span::FullDay => {
                // A full day cannot share the resource with anything, so any
                // half-day entry blocks it even below capacity.
                let mut sum = Entries::ZERO;
                for e in entries {
                    if e.span.slot().is_some() {
                        return true;
                    }
                    sum = sum.add(e.span.weight());
                }
                sum.covers(self.resource.capacity.as_entries())
            }
            Span::HalfDay(slot) => {
                let capacity = i32::from(self.resource.capacity);
                let mut same_slot = 0;
                for e in entries {
                    match e.span.slot() {
                        None => return true,
                        Some(s) if s == slot => same_slot += 1,
                        Some(_) => {}
                    }
                }
                same_slot >= capacity
            }
        }
    }
}

/// Decision of the availability resolver.
#[derive(Clone, Debug)]
pub enum Decision {
    /// A [`Resource`] is free to take the request.
    Available {
        /// ID of the resolved [`Resource`].
        id: resource::Id,

        /// [`resource::Name`] of the resolved [`Resource`].
        name: resource::Name,
    },

    /// No [`Resource`] can take the request.
    Unavailable(Refusal),
}

impl Decision {
    /// Returns the resolved [`Resource`]'s ID, if the [`Decision`] is an
    /// available one.
    #[must_use]
    pub fn resolved_id(&self) -> Option<resource::Id> {
        match self {
            Self::Available { id, .. } => Some(*id),
            Self::Unavailable(_) => None,
        }
    }
}

/// Reason of an unavailable [`Decision`].
///
/// Ordered by how operational the refused [`Resource`]s still are, so the
/// strongest [`Refusal`] across candidates describes the whole target best:
/// "fully booked" beats "closed" whenever at least one candidate was open
/// for business.
#[derive(Clone, Copy, Debug, Display, Eq, Ord, PartialEq, PartialOrd)]
pub enum Refusal {
    /// No [`Resource`]s match the target at all.
    #[display("no resources match the target")]
    NoResources,

    /// A [`Closure`] covers the requested [`Date`].
    #[display("closed for the date")]
    Closed,

    /// The [`OperatingSchedule`] marks the requested [`Date`]'s weekday as
    /// closed.
    #[display("closed on this weekday")]
    ClosedWeekday,

    /// The conflict rule left no room for the request.
    #[display("fully booked")]
    FullyBooked,
}

/// Resolves the given [`Span`] request on the given [`Date`] over the
/// `candidates`.
///
/// Candidates are tried in [`resource::Name`] ascending order, so resolution
/// is deterministic; the first one passing all checks wins.
#[must_use]
pub fn resolve(
    date: Date,
    span: Span,
    mut candidates: Vec<Candidate>,
) -> Decision {
    candidates.sort_by(|a, b| a.resource.name.cmp(&b.resource.name));

    let mut refusal = Refusal::NoResources;
    for c in candidates {
        match c.refusal(date, span) {
            None => {
                return Decision::Available {
                    id: c.resource.id,
                    name: c.resource.name,
                };
            }
            Some(r) => refusal = refusal.max(r),
        }
    }

    Decision::Unavailable(refusal)
}

/// Resolves a [`Booking`] request of the given inclusive date range over the
/// `candidates`, the same way [`resolve()`] does for a single [`Date`].
#[must_use]
pub fn resolve_range(
    starts_on: Date,
    ends_on: Date,
    mut candidates: Vec<Candidate>,
) -> Decision {
    candidates.sort_by(|a, b| a.resource.name.cmp(&b.resource.name));

    let mut refusal = Refusal::NoResources;
    for c in candidates {
        match c.refusal_for_range(starts_on, ends_on) {
            None => {
                return Decision::Available {
                    id: c.resource.id,
                    name: c.resource.name,
                };
            }
            Some(r) => refusal = refusal.max(r),
        }
    }

    Decision::Unavailable(refusal)
}

#[cfg(test)]
mod spec {
    use common::{Date, DateTime, Entries};

    use super::{resolve, resolve_range, Candidate, Decision, Entry, Refusal};
    use crate::domain::{
        closure::{self, Fingerprint, Scope},
        location,
        reservation::{Slot, Span},
        resource::{Capacity, Category, Name},
        schedule::{OperatingSchedule, Weekday},
        Closure, Resource,
    };

    fn date(s: &str) -> Date {
        Date::from_iso8601(s).unwrap()
    }

    fn resource(name: &str, capacity: i32) -> Resource {
        Resource {
            id: crate::domain::resource::Id::new(),
            location_id: location::Id::new(),
            name: Name::new(name).unwrap(),
            category: Category::new("desk").unwrap(),
            capacity: Capacity::new(capacity).unwrap(),
            is_available: true,
            created_at: DateTime::now().coerce(),
            retired_at: None,
        }
    }

    fn candidate(resource: Resource, entries: Vec<Entry>) -> Candidate {
        Candidate {
            resource,
            closures: vec![],
            schedule: vec![],
            entries,
        }
    }

    fn entry(span: Span, on: &str) -> Entry {
        Entry {
            span,
            starts_on: date(on),
            ends_on: date(on),
        }
    }

    fn closure(scope: Scope, from: &str, to: &str) -> Closure {
        let starts_on: closure::StartDate = date(from).coerce();
        let ends_on: closure::EndDate = date(to).coerce();
        let reason = closure::Reason::new("maintenance").unwrap();
        Closure {
            id: closure::Id::new(),
            fingerprint: Fingerprint::new(scope, starts_on, ends_on, &reason),
            scope,
            starts_on,
            ends_on,
            reason,
            created_at: DateTime::now().coerce(),
        }
    }

    fn assert_available(decision: &Decision, expected: &Resource) {
        match decision {
            Decision::Available { id, name } => {
                assert_eq!(*id, expected.id);
                assert_eq!(*name, expected.name);
            }
            Decision::Unavailable(r) => panic!("unavailable: {r:?}"),
        }
    }

    fn assert_refused(decision: &Decision, expected: Refusal) {
        match decision {
            Decision::Available { name, .. } => {
                panic!("unexpectedly available: {name}")
            }
            Decision::Unavailable(r) => assert_eq!(*r, expected),
        }
    }

    #[test]
    fn empty_desk_takes_a_full_day() {
        let desk = resource("Desk A", 1);
        let decision = resolve(
            date("2024-06-10"),
            Span::FullDay,
            vec![candidate(desk.clone(), vec![])],
        );

        assert_available(&decision, &desk);
    }

    #[test]
    fn full_day_blocks_everything() {
        let desk = resource("Desk A", 1);
        let taken = vec![entry(Span::FullDay, "2024-06-10")];

        for span in [
            Span::FullDay,
            Span::HalfDay(Slot::Morning),
            Span::HalfDay(Slot::Afternoon),
        ] {
            let decision = resolve(
                date("2024-06-10"),
                span,
                vec![candidate(desk.clone(), taken.clone())],
            );
            assert_refused(&decision, Refusal::FullyBooked);
        }
    }

    #[test]
    fn half_day_blocks_a_full_day() {
        let desk = resource("Desk A", 1);
        let decision = resolve(
            date("2024-06-10"),
            Span::FullDay,
            vec![candidate(
                desk,
                vec![entry(Span::HalfDay(Slot::Afternoon), "2024-06-10")],
            )],
        );

        assert_refused(&decision, Refusal::FullyBooked);
    }

    #[test]
    fn same_slot_packs_up_to_capacity() {
        let room = resource("Room B", 2);
        let one_morning =
            vec![entry(Span::HalfDay(Slot::Morning), "2024-06-10")];

        // 1 of 2 morning seats taken, the second one fits.
        let decision = resolve(
            date("2024-06-10"),
            Span::HalfDay(Slot::Morning),
            vec![candidate(room.clone(), one_morning.clone())],
        );
        assert_available(&decision, &room);

        let both_mornings = vec![
            entry(Span::HalfDay(Slot::Morning), "2024-06-10"),
            entry(Span::HalfDay(Slot::Morning), "2024-06-10"),
        ];
        let decision = resolve(
            date("2024-06-10"),
            Span::HalfDay(Slot::Morning),
            vec![candidate(room.clone(), both_mornings)],
        );
        assert_refused(&decision, Refusal::FullyBooked);

        // The afternoon seats are untouched by the mornings.
        let decision = resolve(
            date("2024-06-10"),
            Span::HalfDay(Slot::Afternoon),
            vec![candidate(room.clone(), one_morning)],
        );
        assert_available(&decision, &room);
    }

    #[test]
    fn weight_sum_respects_capacity() {
        let room = resource("Room B", 2);

        // One full day on a capacity 2 resource leaves room for another.
        let decision = resolve(
            date("2024-06-10"),
            Span::FullDay,
            vec![candidate(
                room.clone(),
                vec![entry(Span::FullDay, "2024-06-10")],
            )],
        );
        assert_available(&decision, &room);

        let decision = resolve(
            date("2024-06-10"),
            Span::FullDay,
            vec![candidate(
                room,
                vec![
                    entry(Span::FullDay, "2024-06-10"),
                    entry(Span::FullDay, "2024-06-10"),
                ],
            )],
        );
        assert_refused(&decision, Refusal::FullyBooked);
    }

    #[test]
    fn category_resolves_to_first_free_by_name() {
        let taken = vec![entry(Span::FullDay, "2024-06-10")];
        let free = resource("Desk C", 1);

        // Passed out of order on purpose: resolution must not depend on it.
        let decision = resolve(
            date("2024-06-10"),
            Span::FullDay,
            vec![
                candidate(free.clone(), vec![]),
                candidate(resource("Desk A", 1), taken.clone()),
                candidate(resource("Desk B", 1), taken),
            ],
        );

        assert_available(&decision, &free);
    }

    #[test]
    fn lowest_name_wins_among_equally_free() {
        let first = resource("Desk A", 1);
        let decision = resolve(
            date("2024-06-10"),
            Span::FullDay,
            vec![
                candidate(resource("Desk B", 1), vec![]),
                candidate(first.clone(), vec![]),
                candidate(resource("Desk C", 1), vec![]),
            ],
        );

        assert_available(&decision, &first);
    }

    #[test]
    fn no_candidates_at_all() {
        let decision = resolve(date("2024-06-10"), Span::FullDay, vec![]);
        assert_refused(&decision, Refusal::NoResources);
    }

    #[test]
    fn resource_closure_rejects_any_request() {
        let desk = resource("Desk A", 1);
        let mut c = candidate(desk.clone(), vec![]);
        c.closures.push(closure(
            Scope::Resource(desk.id),
            "2024-06-08",
            "2024-06-12",
        ));

        for span in [Span::FullDay, Span::HalfDay(Slot::Morning)] {
            let decision = resolve(date("2024-06-10"), span, vec![c.clone()]);
            assert_refused(&decision, Refusal::Closed);
        }

        // The day after the closure ends is bookable again.
        let decision =
            resolve(date("2024-06-13"), Span::FullDay, vec![c.clone()]);
        assert_available(&decision, &desk);
    }

    #[test]
    fn location_closure_blocks_every_resource_in_it() {
        let desk = resource("Desk A", 1);
        let mut c = candidate(desk.clone(), vec![]);
        c.closures.push(closure(
            Scope::Location(desk.location_id),
            "2024-06-10",
            "2024-06-10",
        ));

        let decision =
            resolve(date("2024-06-10"), Span::FullDay, vec![c.clone()]);
        assert_refused(&decision, Refusal::Closed);

        // A closure of some other location is ignored.
        let mut c = candidate(desk.clone(), vec![]);
        c.closures.push(closure(
            Scope::Location(location::Id::new()),
            "2024-06-10",
            "2024-06-10",
        ));
        let decision = resolve(date("2024-06-10"), Span::FullDay, vec![c]);
        assert_available(&decision, &desk);
    }

    #[test]
    fn closed_weekday_rejects_any_request() {
        let desk = resource("Desk A", 1);
        let mut c = candidate(desk.clone(), vec![]);
        c.schedule.push(OperatingSchedule {
            resource_id: desk.id,
            weekday: Weekday::Sunday,
            is_closed: true,
        });

        // 2024-06-09 is a Sunday.
        let decision = resolve(
            date("2024-06-09"),
            Span::HalfDay(Slot::Morning),
            vec![c.clone()],
        );
        assert_refused(&decision, Refusal::ClosedWeekday);

        let decision = resolve(date("2024-06-10"), Span::FullDay, vec![c]);
        assert_available(&decision, &desk);
    }

    #[test]
    fn fully_booked_outranks_closed_across_candidates() {
        let closed = resource("Desk A", 1);
        let mut closed = candidate(closed.clone(), vec![]);
        closed.closures.push(closure(
            Scope::Resource(closed.resource.id),
            "2024-06-10",
            "2024-06-10",
        ));

        let booked = candidate(
            resource("Desk B", 1),
            vec![entry(Span::FullDay, "2024-06-10")],
        );

        let decision = resolve(
            date("2024-06-10"),
            Span::FullDay,
            vec![closed, booked],
        );
        assert_refused(&decision, Refusal::FullyBooked);
    }

    #[test]
    fn booking_occupies_each_covered_date_as_a_full_day() {
        let desk = resource("Desk A", 1);
        let booking = Entry {
            span: Span::FullDay,
            starts_on: date("2024-06-10"),
            ends_on: date("2024-06-14"),
        };

        for day in ["2024-06-10", "2024-06-12", "2024-06-14"] {
            let decision = resolve(
                date(day),
                Span::HalfDay(Slot::Morning),
                vec![candidate(desk.clone(), vec![booking])],
            );
            assert_refused(&decision, Refusal::FullyBooked);
        }

        let decision = resolve(
            date("2024-06-15"),
            Span::FullDay,
            vec![candidate(desk.clone(), vec![booking])],
        );
        assert_available(&decision, &desk);
    }

    #[test]
    fn range_requires_every_date_free() {
        let desk = resource("Desk A", 1);
        let decision = resolve_range(
            date("2024-06-10"),
            date("2024-06-14"),
            vec![candidate(
                desk,
                vec![entry(Span::HalfDay(Slot::Morning), "2024-06-12")],
            )],
        );

        assert_refused(&decision, Refusal::FullyBooked);
    }

    #[test]
    fn range_ignores_weekly_schedule() {
        let desk = resource("Desk A", 1);
        let mut c = candidate(desk.clone(), vec![]);
        c.schedule.push(OperatingSchedule {
            resource_id: desk.id,
            weekday: Weekday::Sunday,
            is_closed: true,
        });

        // 2024-06-09 (Sunday) is inside the range, yet not a conflict.
        let decision = resolve_range(
            date("2024-06-07"),
            date("2024-06-11"),
            vec![c],
        );
        assert_available(&decision, &desk);
    }

    #[test]
    fn range_respects_closures() {
        let desk = resource("Desk A", 1);
        let mut c = candidate(desk, vec![]);
        c.closures.push(closure(
            Scope::Resource(c.resource.id),
            "2024-06-11",
            "2024-06-11",
        ));

        let decision = resolve_range(
            date("2024-06-10"),
            date("2024-06-14"),
            vec![c],
        );

        assert_refused(&decision, Refusal::Closed);
    }
}
