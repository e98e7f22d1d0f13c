//! Typed records for DOTA to YOLO OBB conversion.
//!
//! Corner points carry their coordinate space as a type parameter, so a
//! pixel-space [`Quad<Pixel>`] read from a DOTA file can only become a
//! [`Quad<Normalized>`] through [`Quad::to_normalized`], which divides by the
//! image size and clamps into `[0, 1]`.
//!
//! # Example
//!
//! ```
//! use dota2yolo::ir::{ClassTable, ObbLabel, Pixel, Quad};
//!
//! let table = ClassTable::from_names(["ship"]);
//! let quad = Quad::<Pixel>::from_flat([10.0, 10.0, 50.0, 10.0, 50.0, 50.0, 10.0, 50.0]);
//! let label = ObbLabel {
//!     class_id: table.id_of("ship").unwrap(),
//!     quad: quad.to_normalized(100.0, 100.0),
//! };
//! assert_eq!(label.to_string(), "0 0.1 0.1 0.5 0.1 0.5 0.5 0.1 0.5");
//! ```

mod class_table;
mod coord;
mod ids;
pub mod io_dota;
pub mod io_yolo_obb;
mod model;
mod quad;
mod space;

pub use class_table::ClassTable;
pub use coord::Coord;
pub use ids::ClassId;
pub use model::{AnnotationRecord, ImageDimensions, ImageRecord, ObbLabel};
pub use quad::Quad;
pub use space::{Normalized, Pixel};
