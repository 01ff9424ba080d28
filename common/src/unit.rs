//! Marker types.

/// Marker type describing an entity creation.
#[derive(Clone, Copy, Debug)]
pub struct Creation;

/// Marker type describing an entity cancellation.
#[derive(Clone, Copy, Debug)]
pub struct Cancellation;

/// Marker type describing an entity retirement.
#[derive(Clone, Copy, Debug)]
pub struct Retirement;

/// Marker type describing an entity termination.
#[derive(Clone, Copy, Debug)]
pub struct Termination;

/// Marker type describing a period start.
#[derive(Clone, Copy, Debug)]
pub struct Start;

/// Marker type describing a period end.
#[derive(Clone, Copy, Debug)]
pub struct End;
