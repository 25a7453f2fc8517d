pub mod any_date;
pub mod types;
