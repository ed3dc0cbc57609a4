pub mod analysis;
pub mod reports;
