//! Support data structures mirrored by the runtime library of generated code.

mod double_array;

pub use double_array::DoubleArray;
