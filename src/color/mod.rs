//! Namespace color assignment.

pub mod allocator;
pub mod palette;

pub use allocator::{ColorAllocator, namespace_hash, preferred_index};
pub use palette::{Color, Palette};
