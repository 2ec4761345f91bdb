pub mod readme;
pub mod status;
pub mod sync;
