pub mod day;
pub mod validate;
