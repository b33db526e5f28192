pub mod context;
pub mod projection;
