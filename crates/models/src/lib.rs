pub mod recognition;
pub mod vin;
