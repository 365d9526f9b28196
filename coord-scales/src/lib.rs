pub mod categorical;
pub mod error;
pub mod factor;
pub mod numeric;
