//! # Column Codec
//!
//! Reads and writes the run-length map format.
//!
//! ## Format
//!
//! A map is one column per `(x, y)`, stored `y`-outer, `x`-inner, with no
//! length prefix or version tag. A column is a list of spans:
//!
//! ```text
//! ┌───┬───┬───┬───┬──────────────┬──────────────┬─────┐
//! │ N │ S │ E │ A │ B G R A (S)  │ B G R A (S+1)│ ... │  (E - S + 1) colors
//! └───┴───┴───┴───┴──────────────┴──────────────┴─────┘
//!  N  non-zero: more spans follow; zero: last span
//!  S  first solid height (inclusive)
//!  E  last solid height (inclusive)
//!  A  declared air start, carried verbatim, never used to move the cursor
//! ```
//!
//! Each color is a little-endian ARGB dword. An empty column is the single
//! header `00 F0 EF 00`.
//!
//! ## Failure Mode
//!
//! Decoding never fails. Truncated input ends the column (and the map pass)
//! where the data runs out and sets [`LoadReport::truncated`].

use aceworld_shared::MAP_X;
use bytemuck::{Pod, Zeroable};

use crate::grid::VoxelMap;
use crate::observer::BlockEvent;

/// Encoding of a column with no solid cells.
pub const EMPTY_COLUMN: [u8; 4] = [0x00, 0xF0, 0xEF, 0x00];

// ============================================================================
// INTERMEDIATE REPRESENTATION
// ============================================================================

/// Four-byte span header, in on-disk order.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct SpanHeader {
    /// Non-zero when another span follows in this column.
    pub next: u8,
    /// First solid height.
    pub start: u8,
    /// Last solid height.
    pub end: u8,
    /// Declared air start.
    pub air_start: u8,
}

impl SpanHeader {
    /// Encoded size in bytes.
    pub const LEN: usize = 4;

    /// Header of [`EMPTY_COLUMN`].
    pub const EMPTY: Self = Self {
        next: 0,
        start: 0xF0,
        end: 0xEF,
        air_start: 0,
    };

    /// Number of color entries following this header.
    #[inline]
    #[must_use]
    pub fn color_count(&self) -> usize {
        (i32::from(self.end) - i32::from(self.start) + 1).max(0) as usize
    }

    /// Whether this is the final span of its column.
    #[inline]
    #[must_use]
    pub fn is_last(&self) -> bool {
        self.next == 0
    }
}

/// One decoded span.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Span {
    /// Header as read.
    pub header: SpanHeader,
    /// ARGB colors for heights `start..=end`.
    pub colors: Vec<u32>,
}

/// One decoded column.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Column {
    /// Spans in file order.
    pub spans: Vec<Span>,
}

/// Outcome of decoding a single column.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ColumnRead {
    /// Spans read before the terminator or the end of input.
    pub column: Column,
    /// Input ended before the terminating span was complete.
    pub truncated: bool,
}

/// Summary of a decode pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Columns visited.
    pub columns: usize,
    /// Cells that turned from air to solid.
    pub blocks: u64,
    /// Bytes consumed.
    pub bytes_read: usize,
    /// Input ran out mid-column.
    pub truncated: bool,
}

/// Takes the next dword, or `None` when fewer than four bytes remain.
#[inline]
fn take_dword(data: &[u8], cursor: &mut usize) -> Option<[u8; 4]> {
    let end = cursor.checked_add(4)?;
    let bytes: [u8; 4] = data.get(*cursor..end)?.try_into().ok()?;
    *cursor = end;
    Some(bytes)
}

/// Decodes one column starting at `cursor`, advancing it past the column.
///
/// On truncation the cursor is left at the end of `data`.
#[must_use]
pub fn read_column(data: &[u8], cursor: &mut usize) -> ColumnRead {
    let mut read = ColumnRead::default();
    loop {
        if *cursor >= data.len() {
            read.truncated = true;
            break;
        }
        let Some(raw) = take_dword(data, cursor) else {
            read.truncated = true;
            *cursor = data.len();
            break;
        };
        let header: SpanHeader = bytemuck::cast(raw);

        let count = header.color_count();
        let mut colors = Vec::with_capacity(count);
        for _ in 0..count {
            match take_dword(data, cursor) {
                Some(bytes) => colors.push(u32::from_le_bytes(bytes)),
                None => {
                    read.truncated = true;
                    *cursor = data.len();
                    break;
                }
            }
        }

        read.column.spans.push(Span { header, colors });
        if read.truncated || header.is_last() {
            break;
        }
    }
    read
}

impl Column {
    /// Builds the column at `(x, y)`: one span per contiguous solid run.
    #[must_use]
    pub fn from_map(map: &VoxelMap, x: i32, y: i32) -> Self {
        let (_, _, size_z) = map.dimensions();
        let mut spans = Vec::new();
        let mut z = 0;
        while z < size_z {
            if !map.get_solid(x, y, z) {
                z += 1;
                continue;
            }
            let start = z;
            let mut colors = Vec::new();
            while z < size_z && map.get_solid(x, y, z) {
                colors.push(map.get_color(x, y, z));
                z += 1;
            }
            let end = z - 1;
            spans.push(Span {
                header: SpanHeader {
                    next: (1 + colors.len()) as u8,
                    start: start as u8,
                    end: end as u8,
                    air_start: (end + 1) as u8,
                },
                colors,
            });
        }

        match spans.last_mut() {
            Some(last) => last.header.next = 0,
            None => spans.push(Span {
                header: SpanHeader::EMPTY,
                colors: Vec::new(),
            }),
        }
        Self { spans }
    }

    /// Appends the encoded column to `out`. Headers are written verbatim.
    pub fn write_to(&self, out: &mut Vec<u8>) {
        for span in &self.spans {
            out.extend_from_slice(bytemuck::bytes_of(&span.header));
            for color in &span.colors {
                out.extend_from_slice(&color.to_le_bytes());
            }
        }
    }

    /// Writes every span's colors into `(x, y)`. Heights outside the grid
    /// are dropped. Returns the number of cells that turned solid.
    pub fn apply(&self, map: &mut VoxelMap, x: i32, y: i32) -> u64 {
        let mut added = 0;
        for span in &self.spans {
            let start = i32::from(span.header.start);
            for (z, &color) in (start..).zip(&span.colors) {
                if map.load_cell(x, y, z, color) {
                    added += 1;
                }
            }
        }
        added
    }
}

/// Horizontal size of a serialized map. The format only stores 512 maps.
#[must_use]
pub fn vxl_size(_data: &[u8]) -> u32 {
    MAP_X as u32
}

// ============================================================================
// MAP ENTRY POINTS
// ============================================================================

impl VoxelMap {
    /// Decodes one column into `(x, y)` starting at `cursor`.
    pub fn load_column(&mut self, x: i32, y: i32, data: &[u8], cursor: &mut usize) -> LoadReport {
        let begin = *cursor;
        let read = read_column(data, cursor);
        LoadReport {
            columns: 1,
            blocks: read.column.apply(self, x, y),
            bytes_read: *cursor - begin,
            truncated: read.truncated,
        }
    }

    /// Encodes the column at `(x, y)` onto `out`.
    pub fn save_column(&self, x: i32, y: i32, out: &mut Vec<u8>) {
        Column::from_map(self, x, y).write_to(out);
    }

    /// Decodes a full map over the current contents.
    ///
    /// Columns are visited `y`-outer, `x`-inner until input runs out. Cells
    /// not named by the data are left unchanged. Inputs shorter than one
    /// header are ignored.
    pub fn load_vxl(&mut self, data: &[u8]) -> LoadReport {
        let mut report = LoadReport::default();
        if data.len() < SpanHeader::LEN {
            return report;
        }

        let (size_x, size_y, _) = self.dimensions();
        let mut cursor = 0usize;
        'columns: for y in 0..size_y {
            for x in 0..size_x {
                if cursor >= data.len() {
                    break 'columns;
                }
                let column = self.load_column(x, y, data, &mut cursor);
                report.columns += 1;
                report.blocks += column.blocks;
                if column.truncated {
                    report.truncated = true;
                    break 'columns;
                }
            }
        }
        report.bytes_read = cursor;

        if report.truncated {
            tracing::warn!(
                "map data truncated after {} columns ({} bytes)",
                report.columns,
                data.len()
            );
        }
        tracing::debug!(
            "loaded {} columns, {} new blocks, {} total",
            report.columns,
            report.blocks,
            self.total_blocks()
        );
        self.notify(&BlockEvent::Loaded);
        report
    }

    /// Same as [`VoxelMap::load_vxl`].
    pub fn load_part_vxl(&mut self, data: &[u8]) -> LoadReport {
        self.load_vxl(data)
    }

    /// Creates a map sized by [`vxl_size`] and decodes `data` into it.
    #[must_use]
    pub fn from_vxl(data: &[u8]) -> (Self, LoadReport) {
        let mut map = Self::new(vxl_size(data));
        let report = map.load_vxl(data);
        (map, report)
    }

    /// Encodes the whole map.
    #[must_use]
    pub fn save_vxl(&self) -> Vec<u8> {
        let (size_x, size_y, _) = self.dimensions();
        let mut out = Vec::with_capacity((size_x as usize) * (size_y as usize) * SpanHeader::LEN * 2);
        for y in 0..size_y {
            for x in 0..size_x {
                self.save_column(x, y, &mut out);
            }
        }
        tracing::debug!("saved {}x{} map in {} bytes", size_x, size_y, out.len());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(map: &VoxelMap, x: i32, y: i32) -> Vec<u8> {
        let mut out = Vec::new();
        map.save_column(x, y, &mut out);
        out
    }

    #[test]
    fn test_empty_column_encoding() {
        let map = VoxelMap::new(4);
        assert_eq!(encode(&map, 0, 0), EMPTY_COLUMN);
        assert_eq!(SpanHeader::EMPTY.color_count(), 0);
    }

    #[test]
    fn test_empty_column_reencodes_exactly() {
        let mut map = VoxelMap::new(4);
        let mut cursor = 0;
        let report = map.load_column(2, 3, &EMPTY_COLUMN, &mut cursor);
        assert!(!report.truncated);
        assert_eq!(report.blocks, 0);
        assert_eq!(cursor, EMPTY_COLUMN.len());
        assert_eq!(encode(&map, 2, 3), vec![0x00, 0xF0, 0xEF, 0x00]);
    }

    #[test]
    fn test_single_run_encoding() {
        let mut map = VoxelMap::new(4);
        map.set_point(1, 2, 62, 0x4433_2211);
        map.set_point(1, 2, 63, 0x8877_6655);
        assert_eq!(
            encode(&map, 1, 2),
            vec![0, 62, 63, 64, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88]
        );
    }

    #[test]
    fn test_multi_run_headers() {
        let mut map = VoxelMap::new(4);
        for z in [10, 11, 12, 40, 63] {
            map.set_point(0, 0, z, 1);
        }
        let column = Column::from_map(&map, 0, 0);
        let headers: Vec<_> = column.spans.iter().map(|s| s.header).collect();
        assert_eq!(
            headers,
            vec![
                SpanHeader { next: 4, start: 10, end: 12, air_start: 13 },
                SpanHeader { next: 2, start: 40, end: 40, air_start: 41 },
                SpanHeader { next: 0, start: 63, end: 63, air_start: 64 },
            ]
        );
        // N counts the dwords of its span, so it also locates the next header.
        let bytes = encode(&map, 0, 0);
        assert_eq!(bytes.len(), 4 * (4 + 2 + 2));
        assert_eq!(bytes[4 * 4..4 * 4 + 4], [2, 40, 40, 41]);
    }

    #[test]
    fn test_color_byte_order() {
        let mut map = VoxelMap::new(1);
        let mut cursor = 0;
        let data = [0, 5, 5, 6, 0x11, 0x22, 0x33, 0x44];
        let report = map.load_column(0, 0, &data, &mut cursor);
        assert_eq!(map.get_color(0, 0, 5), 0x4433_2211);
        assert_eq!(report.blocks, 1);
        assert_eq!(cursor, data.len());
        assert!(!report.truncated);
    }

    #[test]
    fn test_air_start_does_not_move_cursor() {
        let data = [3, 1, 2, 0xFF, 1, 0, 0, 0, 2, 0, 0, 0, 0, 7, 7, 0x00, 9, 0, 0, 0];
        let mut cursor = 0;
        let read = read_column(&data, &mut cursor);
        assert!(!read.truncated);
        assert_eq!(cursor, data.len());
        assert_eq!(read.column.spans.len(), 2);
        assert_eq!(read.column.spans[0].header.air_start, 0xFF);
        assert_eq!(read.column.spans[1].colors, vec![9]);

        let mut out = Vec::new();
        read.column.write_to(&mut out);
        assert_eq!(out, data);
    }

    #[test]
    fn test_heights_above_grid_are_dropped() {
        let mut map = VoxelMap::new(1);
        let mut data = vec![0, 62, 66, 67];
        for c in 0u8..5 {
            data.extend_from_slice(&[c, 0, 0, 0]);
        }
        let mut cursor = 0;
        let report = map.load_column(0, 0, &data, &mut cursor);
        assert_eq!(cursor, data.len());
        assert_eq!(report.blocks, 2);
        assert_eq!(map.get_color(0, 0, 63), 1);
        assert_eq!(map.total_blocks(), 2);
    }

    #[test]
    fn test_truncated_header() {
        let data = [1, 2];
        let mut cursor = 0;
        let read = read_column(&data, &mut cursor);
        assert!(read.truncated);
        assert!(read.column.spans.is_empty());
        assert_eq!(cursor, 2);
    }

    #[test]
    fn test_truncated_colors_keep_prefix() {
        let mut map = VoxelMap::new(1);
        let data = [0, 0, 3, 4, 1, 0, 0, 0, 2, 0];
        let mut cursor = 0;
        let report = map.load_column(0, 0, &data, &mut cursor);
        assert!(report.truncated);
        assert_eq!(cursor, data.len());
        assert_eq!(report.blocks, 1);
        assert!(map.get_solid(0, 0, 0));
        assert!(!map.get_solid(0, 0, 1));
    }

    #[test]
    fn test_unterminated_column_is_truncated() {
        let data = [1, 0, 0, 1, 5, 0, 0, 0];
        let mut cursor = 0;
        let read = read_column(&data, &mut cursor);
        assert!(read.truncated);
        assert_eq!(read.column.spans.len(), 1);
    }

    #[test]
    fn test_map_order_is_y_outer() {
        let mut source = VoxelMap::new(2);
        source.set_point(0, 1, 7, 0xAB);
        let bytes = source.save_vxl();

        let mut cursor = 0;
        let mut expected_third = Vec::new();
        source.save_column(0, 1, &mut expected_third);
        for _ in 0..2 {
            let _ = read_column(&bytes, &mut cursor);
        }
        let third = read_column(&bytes, &mut cursor);
        let mut out = Vec::new();
        third.column.write_to(&mut out);
        assert_eq!(out, expected_third);
    }

    #[test]
    fn test_load_ignores_short_input() {
        let mut map = VoxelMap::new(2);
        let report = map.load_vxl(&[0, 1, 2]);
        assert_eq!(report, LoadReport::default());
        assert_eq!(map.total_blocks(), 0);
    }

    #[test]
    fn test_load_overlays_existing_blocks() {
        let mut source = VoxelMap::new(2);
        source.set_point(1, 1, 3, 5);
        let bytes = source.save_vxl();

        let mut target = VoxelMap::new(2);
        target.set_point(1, 1, 3, 9);
        target.set_point(0, 0, 0, 9);
        let report = target.load_vxl(&bytes);
        assert_eq!(report.columns, 4);
        assert_eq!(report.blocks, 0);
        assert_eq!(report.bytes_read, bytes.len());
        assert_eq!(target.total_blocks(), 2);
        assert_eq!(target.get_color(1, 1, 3), 5);
    }

    #[test]
    fn test_partial_map_stops_at_end() {
        let mut map = VoxelMap::new(4);
        let mut data = Vec::new();
        data.extend_from_slice(&[0, 1, 1, 2, 1, 0, 0, 0]);
        data.extend_from_slice(&EMPTY_COLUMN);
        let report = map.load_vxl(&data);
        assert_eq!(report.columns, 2);
        assert!(!report.truncated);
        assert!(map.get_solid(0, 0, 1));
    }

    #[test]
    fn test_vxl_size() {
        assert_eq!(vxl_size(&[]), 512);
    }
}
