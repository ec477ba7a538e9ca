pub mod taxonomy_repo;
pub use taxonomy_repo::TaxonomyRepository;
pub mod evaluation_repo;
pub use evaluation_repo::EvaluationRepository;
pub mod organization_repo;
pub use organization_repo::OrganizationRepository;
