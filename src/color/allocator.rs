// src/color/allocator.rs

use super::palette::{Color, Palette};
use bitvec::vec::BitVec;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

/// Classic 32-bit string hash (`h = h * 31 + unit`) over UTF-16 code units.
pub fn namespace_hash(namespace: &str) -> i32 {
    namespace
        .encode_utf16()
        .fold(0i32, |hash, unit| hash.wrapping_mul(31).wrapping_add(i32::from(unit)))
}

/// The palette index a namespace asks for before collision avoidance.
///
/// `len` must be non-zero.
pub fn preferred_index(namespace: &str, len: usize) -> usize {
    namespace_hash(namespace).unsigned_abs() as usize % len
}

/// Hands out palette indices so that concurrently active namespaces get
/// distinct colors for as long as the palette has free entries.
///
/// When every index is taken the table is cleared and allocation starts
/// over, so uniqueness is best effort after the palette rolls over.
#[derive(Debug, Default)]
pub struct ColorAllocator {
    in_use: Mutex<BitVec>,
}

static SHARED: OnceLock<Arc<ColorAllocator>> = OnceLock::new();

impl ColorAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide allocator used by environments unless they are
    /// given their own.
    pub fn shared() -> Arc<ColorAllocator> {
        Arc::clone(SHARED.get_or_init(|| Arc::new(ColorAllocator::new())))
    }

    /// Picks a color for `namespace`, probing forward from its preferred
    /// index to the first free one.
    pub fn select(&self, namespace: &str, palette: &Palette) -> Color {
        let index = self.select_index(namespace, palette.len());
        palette[index].clone()
    }

    /// Index-level form of [`select`](Self::select).
    pub fn select_index(&self, namespace: &str, len: usize) -> usize {
        let mut in_use = self.in_use.lock().unwrap_or_else(PoisonError::into_inner);
        if in_use.len() < len {
            in_use.resize(len, false);
        }

        let preferred = preferred_index(namespace, len);
        let free = (0..len)
            .map(|offset| (preferred + offset) % len)
            .find(|&candidate| !in_use[candidate]);

        let index = match free {
            Some(index) => index,
            None => {
                log::debug!("color palette of {} exhausted, rolling over", len);
                in_use.fill(false);
                preferred
            }
        };

        in_use.set(index, true);
        index
    }

    /// Forgets every assignment.
    pub fn reset(&self) {
        self.in_use
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .fill(false);
    }

    /// Number of indices currently marked in use.
    pub fn in_use_count(&self) -> usize {
        self.in_use
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .count_ones()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_hash_matches_java_string_hash() {
        assert_eq!(namespace_hash(""), 0);
        assert_eq!(namespace_hash("a"), 97);
        assert_eq!(namespace_hash("ab"), 97 * 31 + 98);
        // Long inputs wrap at 32 bits instead of overflowing.
        let long = "namespace:".repeat(50);
        let _ = namespace_hash(&long);
    }

    #[test]
    fn test_preferred_index_is_stable() {
        for ns in ["auth", "auth:login", "db:query", "\u{1F600}"] {
            let first = preferred_index(ns, 10);
            assert!(first < 10);
            assert_eq!(first, preferred_index(ns, 10));
        }
    }

    #[test]
    fn test_distinct_while_headroom_remains() {
        let allocator = ColorAllocator::new();
        let palette = Palette::ansi_256();
        let names: Vec<String> = (0..palette.len()).map(|i| format!("ns:{}", i)).collect();

        let mut seen = HashSet::new();
        for name in &names {
            let color = allocator.select(name, &palette);
            assert!(seen.insert(color), "{name} reused a color with headroom left");
        }
        assert_eq!(allocator.in_use_count(), palette.len());
    }

    #[test]
    fn test_collision_probes_forward() {
        let allocator = ColorAllocator::new();
        // Same string twice: the second request probes to the next index.
        let first = allocator.select_index("same", 6);
        let second = allocator.select_index("same", 6);
        assert_eq!(second, (first + 1) % 6);
    }

    #[test]
    fn test_rolls_over_when_exhausted() {
        let allocator = ColorAllocator::new();
        for i in 0..3 {
            allocator.select_index(&format!("n{}", i), 3);
        }
        assert_eq!(allocator.in_use_count(), 3);

        let index = allocator.select_index("late", 3);
        assert_eq!(index, preferred_index("late", 3));
        assert_eq!(allocator.in_use_count(), 1);
    }

    #[test]
    fn test_reset_and_independent_allocators() {
        let a = ColorAllocator::new();
        let b = ColorAllocator::new();
        a.select_index("x", 4);
        a.select_index("y", 4);
        assert_eq!(a.in_use_count(), 2);
        assert_eq!(b.in_use_count(), 0);

        a.reset();
        assert_eq!(a.in_use_count(), 0);
    }

    #[test]
    fn test_single_color_palette() {
        let allocator = ColorAllocator::new();
        let palette = Palette::new(vec![Color::Ansi(2)]).unwrap();
        assert_eq!(allocator.select("a", &palette), Color::Ansi(2));
        assert_eq!(allocator.select("b", &palette), Color::Ansi(2));
    }
}
