pub mod aggregation;
pub mod auth;
pub mod classification;
pub mod comparison;
pub mod evaluation_service;
pub mod gap_detector;
pub mod organization_service;
pub mod taxonomy_service;
pub mod taxonomy_store;
pub mod tree_builder;

#[cfg(test)]
mod test_support;
