pub mod geo;
pub mod retry;
pub mod serde;
