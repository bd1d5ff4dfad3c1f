pub(crate) mod clip;
pub(crate) mod metrics;
pub(crate) mod path;
pub(crate) mod transform;
