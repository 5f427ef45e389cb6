pub mod fix;
pub mod probe;
