pub mod impact;
pub mod outage;
