//! Scene construction: the displaced photo plane and the cosmetic backdrop.

pub(crate) mod backdrop;
pub(crate) mod mesh;
pub(crate) mod parallax;
