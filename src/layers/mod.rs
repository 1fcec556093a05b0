pub mod basemap;
pub mod grid;
pub mod user;
