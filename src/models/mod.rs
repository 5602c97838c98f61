pub mod api;
pub mod prediction;
pub mod weather;
