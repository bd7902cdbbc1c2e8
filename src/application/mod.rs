mod geo_block_service;

pub use geo_block_service::GeoBlockService;
