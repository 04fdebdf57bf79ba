//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods
//! that accept `&PgPool` as the first argument.

pub mod asset_repo;
pub mod catalog_repo;
pub mod category_repo;
pub mod collection_repo;
pub mod section_repo;
pub mod stats_repo;
pub mod tag_repo;
pub mod user_repo;

pub use asset_repo::AssetRepo;
pub use catalog_repo::CatalogRepo;
pub use category_repo::CategoryRepo;
pub use collection_repo::CollectionRepo;
pub use section_repo::SectionRepo;
pub use stats_repo::StatsRepo;
pub use tag_repo::TagRepo;
pub use user_repo::UserRepo;
