pub(crate) mod build;
pub(crate) mod model;
pub(crate) mod spec;
pub(crate) mod style;
