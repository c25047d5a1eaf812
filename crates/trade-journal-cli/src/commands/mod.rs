pub mod export;
pub mod goals;
pub mod journal;
pub mod risk;
