// Globally available exports
pub mod error;
pub mod record;
pub mod tree;
