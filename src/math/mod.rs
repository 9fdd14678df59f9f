pub mod color;
mod ray;

pub use color::Color;
pub use ray::{click_to_ndc, hits_sphere, unproject_direction, Ray, HIT_RADIUS};
