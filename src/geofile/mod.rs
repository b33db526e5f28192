pub mod geojson;
pub mod region;
