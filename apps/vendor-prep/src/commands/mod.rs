pub mod prepare;
pub mod status;
