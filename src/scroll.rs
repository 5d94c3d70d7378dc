pub(crate) mod progress;
pub(crate) mod signal;
pub(crate) mod spring;
