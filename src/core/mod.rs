//! Engine internals: the retry loop, its builder, and the operation seam.

mod builder;
mod operation;
mod retrier;

pub use builder::RetrierBuilder;
pub use operation::Operation;
pub use retrier::Retrier;
