pub mod cache;

pub use cache::DatasetCache;
