pub mod sample;
pub mod status;
pub mod topics;
