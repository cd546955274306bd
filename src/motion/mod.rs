pub(crate) mod classify;
pub(crate) mod dwell;
