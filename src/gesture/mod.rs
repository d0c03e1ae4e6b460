pub mod classifier;
pub mod session;
pub mod types;

pub use classifier::ClassifierStrategy;
pub use session::{DragRelease, DragSession, DragSlot};
pub use types::{Axis, DragBounds, PointerId, PointerSample, Vector2};
