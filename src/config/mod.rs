pub(crate) mod palette;
pub(crate) mod params;
pub(crate) mod profile;
