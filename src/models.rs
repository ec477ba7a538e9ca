pub mod auth;
pub mod classification;
pub mod evaluation;
pub mod organization;
pub mod stats;
pub mod taxonomy;
pub mod tree;
