pub mod access;
pub mod authorize;

pub use authorize::{Target, protect};
