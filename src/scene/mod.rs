pub(crate) mod ball;
pub(crate) mod particles;
pub(crate) mod ring;
pub(crate) mod state;
