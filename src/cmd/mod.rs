pub mod load;
pub mod validate;
