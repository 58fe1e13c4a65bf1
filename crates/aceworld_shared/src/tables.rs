//! # Lookup Tables
//!
//! The 256-entry direction table and the CRC-32 checksum.
//!
//! Both are built once by an explicit constructor and are read-only
//! afterwards, so a single instance can be shared across threads without
//! locking. There is no hidden global: callers own the tables and pass them
//! to whatever needs them.

use crate::math::Vector3;

/// Number of entries in the direction table.
pub const DIRECTION_COUNT: usize = 256;

// ============================================================================
// DIRECTION TABLE
// ============================================================================

/// 256 unit vectors indexed by a byte.
///
/// Entries follow an equal-area latitude layout:
/// `theta = i * 2pi / 256`, `phi = acos(1 - 2 * (i + 0.5) / 256)`.
#[derive(Clone, Debug)]
pub struct DirectionTable {
    entries: Box<[Vector3; DIRECTION_COUNT]>,
}

impl DirectionTable {
    /// Computes the table.
    #[must_use]
    pub fn new() -> Self {
        let mut entries = Box::new([Vector3::ZERO; DIRECTION_COUNT]);
        for (i, entry) in entries.iter_mut().enumerate() {
            let i = i as f64;
            let theta = i * std::f64::consts::TAU / DIRECTION_COUNT as f64;
            let phi = (1.0 - 2.0 * (i + 0.5) / DIRECTION_COUNT as f64).acos();
            *entry = Vector3::new(phi.sin() * theta.cos(), phi.sin() * theta.sin(), phi.cos());
        }
        Self { entries }
    }

    /// Looks up a direction. Indices outside `0..256` yield the zero vector.
    #[inline]
    #[must_use]
    pub fn direction_from_index(&self, index: i64) -> Vector3 {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.entries.get(i))
            .copied()
            .unwrap_or(Vector3::ZERO)
    }

    /// Looks up a direction using only the low byte of `index`.
    #[inline]
    #[must_use]
    pub fn index_to_vector(&self, index: i64) -> Vector3 {
        self.entries[(index & 0xFF) as usize]
    }

    /// All entries in index order.
    #[must_use]
    pub fn entries(&self) -> &[Vector3; DIRECTION_COUNT] {
        &self.entries
    }
}

impl Default for DirectionTable {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// CRC-32
// ============================================================================

/// CRC-32 (IEEE 802.3) checksums with a continuable seed.
///
/// Backed by `crc32fast`, which picks a hardware path when available.
#[derive(Clone, Copy, Debug, Default)]
pub struct Crc32Table;

impl Crc32Table {
    /// Creates the checksum handle.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Checksums `data`, continuing from a previous checksum `seed`.
    ///
    /// Pass `0` to start a new checksum. Feeding the result of one call as
    /// the seed of the next gives the same value as checksumming the
    /// concatenated buffers.
    #[must_use]
    pub fn checksum(&self, data: &[u8], seed: u32) -> u32 {
        let mut hasher = crc32fast::Hasher::new_with_initial(seed);
        hasher.update(data);
        hasher.finalize()
    }
}

// ============================================================================
// STARTUP
// ============================================================================

/// Every process-wide table, built together at startup.
#[derive(Clone, Debug, Default)]
pub struct Tables {
    /// Byte-indexed unit vectors.
    pub directions: DirectionTable,
    /// CRC-32 checksums.
    pub crc: Crc32Table,
}

impl Tables {
    /// Builds all tables. Call once and share the result.
    #[must_use]
    pub fn initialize() -> Self {
        let tables = Self {
            directions: DirectionTable::new(),
            crc: Crc32Table::new(),
        };
        tracing::debug!("lookup tables initialized ({} directions)", DIRECTION_COUNT);
        tables
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crc32_reference_vector() {
        let crc = Crc32Table::new();
        assert_eq!(crc.checksum(b"123456789", 0), 0xCBF4_3926);
        assert_eq!(crc.checksum(&[], 0), 0);
    }

    #[test]
    fn test_crc32_incremental() {
        let crc = Crc32Table::new();
        let whole = crc.checksum(b"hello, voxel world", 0);
        let first = crc.checksum(b"hello, ", 0);
        assert_eq!(crc.checksum(b"voxel world", first), whole);
    }

    #[test]
    fn test_crc32_seed_chains_across_many_chunks() {
        let crc = Crc32Table::new();
        let data: Vec<u8> = (0..4096u32).map(|i| (i.wrapping_mul(2_654_435_761) >> 13) as u8).collect();
        let whole = crc.checksum(&data, 0);
        let chained = data.chunks(333).fold(0, |seed, chunk| crc.checksum(chunk, seed));
        assert_eq!(chained, whole);
        assert_eq!(whole, crc32fast::hash(&data));
    }

    #[test]
    fn test_direction_table_unit_length() {
        let table = DirectionTable::new();
        for (i, v) in table.entries().iter().enumerate() {
            assert!((v.magnitude() - 1.0).abs() < 1e-5, "entry {i} has length {}", v.magnitude());
        }
    }

    #[test]
    fn test_direction_table_bounds() {
        let table = DirectionTable::new();
        assert_eq!(table.direction_from_index(-1), Vector3::ZERO);
        assert_eq!(table.direction_from_index(256), Vector3::ZERO);
        assert_eq!(table.direction_from_index(0), table.entries()[0]);
        assert_eq!(table.index_to_vector(256 + 7), table.entries()[7]);
    }

    #[test]
    fn test_direction_table_poles() {
        let table = DirectionTable::new();
        // First entry sits near the +z pole, last near -z.
        assert!(table.direction_from_index(0).z > 0.99);
        assert!(table.direction_from_index(255).z < -0.99);
    }

    #[test]
    fn test_tables_are_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Tables>();
    }
}
