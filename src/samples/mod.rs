pub(crate) mod csv;
pub(crate) mod model;
pub(crate) mod store;
