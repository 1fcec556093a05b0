pub mod geojson;
pub mod parser;
