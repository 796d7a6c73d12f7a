//! The type system: the [`TypeRegistry`] and the [`Type`] values it owns.

mod registry;

pub use registry::{Type, TypeRegistry};
