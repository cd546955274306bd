pub(crate) mod clock;
pub(crate) mod observer;
pub(crate) mod session;
