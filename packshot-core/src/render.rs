pub mod banner;
pub mod color;
pub mod gradient;
