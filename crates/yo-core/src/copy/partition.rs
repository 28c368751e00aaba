use std::num::NonZeroUsize;

/// Contiguous byte interval `[offset, offset + size)` owned by one worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorkRange {
    pub offset: u64,
    pub size: u64,
}

impl WorkRange {
    pub fn new(offset: u64, size: u64) -> Self {
        Self { offset, size }
    }

    /// One past the last byte of the range.
    pub fn end(&self) -> u64 {
        self.offset + self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }
}

/// Split `[0, size)` into exactly `workers` ranges.
///
/// Every range but the last holds `size / workers` bytes; the last one also
/// takes the remainder, so the sizes always add up to `size`.
pub fn partition(size: u64, workers: NonZeroUsize) -> Vec<WorkRange> {
    let count = workers.get() as u64;
    let base = size / count;
    (0..count)
        .map(|i| {
            let offset = i * base;
            let len = if i + 1 == count { size - offset } else { base };
            WorkRange::new(offset, len)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn workers(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    fn assert_tiles(size: u64, ranges: &[WorkRange]) {
        let mut cursor = 0;
        for range in ranges {
            assert_eq!(range.offset, cursor, "gap or overlap at {cursor}");
            cursor = range.end();
        }
        assert_eq!(cursor, size);
        assert_eq!(ranges.iter().map(|r| r.size).sum::<u64>(), size);
    }

    #[test]
    fn test_ten_bytes_three_workers() {
        let ranges = partition(10, workers(3));
        let sizes: Vec<u64> = ranges.iter().map(|r| r.size).collect();
        assert_eq!(sizes, vec![3, 3, 4]);
        assert_eq!(ranges[2], WorkRange::new(6, 4));
    }

    #[test]
    fn test_even_split() {
        let ranges = partition(64 * 1024 * 1024, workers(4));
        assert_eq!(ranges.len(), 4);
        assert!(ranges.iter().all(|r| r.size == 16 * 1024 * 1024));
    }

    #[test]
    fn test_single_worker_takes_everything() {
        assert_eq!(partition(12345, workers(1)), vec![WorkRange::new(0, 12345)]);
    }

    #[test]
    fn test_more_workers_than_bytes() {
        let ranges = partition(3, workers(8));
        assert_eq!(ranges.len(), 8);
        assert!(ranges[..7].iter().all(|r| r.is_empty() && r.offset == 0));
        assert_eq!(ranges[7], WorkRange::new(0, 3));
        assert_tiles(3, &ranges);
    }

    #[test]
    fn test_empty_source() {
        let ranges = partition(0, workers(4));
        assert_eq!(ranges.len(), 4);
        assert!(ranges.iter().all(WorkRange::is_empty));
    }

    #[test]
    fn test_ranges_tile_exactly() {
        for size in 0..200u64 {
            for n in 1..=17usize {
                let ranges = partition(size, workers(n));
                assert_eq!(ranges.len(), n);
                assert_tiles(size, &ranges);
            }
        }
    }

    #[test]
    fn test_large_sizes() {
        for &size in &[u64::MAX / 2, (1 << 40) + 7, 999_999_999_999] {
            for &n in &[1usize, 3, 7, 64, 1000] {
                assert_tiles(size, &partition(size, workers(n)));
            }
        }
    }
}
