pub mod linear;

pub use linear::LinearInterpolator;
