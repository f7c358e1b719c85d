pub mod album;
pub mod asset;
pub mod exif;
pub mod timeline;

pub use album::AlbumRepository;
pub use asset::AssetRepository;
pub use exif::ExifRepository;
pub use timeline::TimelineRepository;
