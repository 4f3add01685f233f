// Service exports
pub mod catalog;
pub mod embedding;
pub mod geocode;

pub use catalog::{CatalogError, CatalogStore, PostgresCatalog};
pub use embedding::{EmbeddingError, EmbeddingProvider, HttpEmbeddingClient};
pub use geocode::{Geocoder, StaticGeocoder};
