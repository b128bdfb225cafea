pub mod coordinate;
pub use coordinate::{ChrIdx, Coordinate, GenomeCoordinate, Position};

mod marker;
pub use marker::Marker;

mod genetic_map;
pub use genetic_map::{GeneticMap, GeneticMapError};
