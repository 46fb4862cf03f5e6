pub mod bounds;
pub mod category;
pub mod profile;
