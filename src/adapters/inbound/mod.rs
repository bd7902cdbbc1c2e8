mod geo_block_layer;
mod http_server;

pub use geo_block_layer::{
    candidate_ips_from_headers, GeoBlockLayer, GeoBlockMiddleware, X_FORWARDED_FOR, X_REAL_IP,
};
pub use http_server::{HealthResponse, HttpServer};
