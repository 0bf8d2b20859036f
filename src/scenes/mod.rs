//! Scene objects. Each owns its pipeline and buffers and registers one draw
//! listener with the scheduler when constructed.

mod common;
mod cube;
mod globe;
mod marker;
mod triangle;

pub use common::{SceneScheduler, SharedCamera};
pub use cube::{cube_model_matrix, Cube, CUBE_PRIORITY, SPIN_SPEED};
pub use globe::{globe_mvp, Globe, GLOBE_PRIORITY, GLOBE_RADIUS};
pub use marker::{marker_model_matrix, Marker, MARKER_DIRECTION, MARKER_PRIORITY};
pub use triangle::{Triangle, TRIANGLE_PRIORITY};
