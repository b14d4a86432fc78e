pub mod assets;
pub mod db;
pub mod memory;

pub use assets::LocalAssetUploader;
pub use db::PgDocumentStore;
pub use memory::MemoryDocumentStore;
