pub use self::{body::*, geometry::*, shape::*};

mod body;
mod geometry;
mod shape;
