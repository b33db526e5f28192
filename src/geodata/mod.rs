pub mod error;
pub mod fallback;
pub mod filter;
pub mod provider;
pub mod source;
pub mod status;
