pub(crate) mod collision;
pub(crate) mod step;
