pub(crate) mod interpolate;
pub(crate) mod interval;
pub(crate) mod schedule;
