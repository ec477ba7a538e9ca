pub mod analytics;
pub mod evaluations;
pub mod organizations;
pub mod taxonomy;
