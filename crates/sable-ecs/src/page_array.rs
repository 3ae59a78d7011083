//! Paginated sparse index.
//!
//! A [`PageArray`] behaves like a huge `index -> slot` array but stores its
//! entries in fixed-size pages that are allocated lazily and can be
//! reclaimed individually once empty. Absent pages cost one pointer-sized
//! slot each, so sparse id distributions stay cheap.
//!
//! The page size is a constructor parameter (`1 << page_bits`); values of
//! 7..=11 (128 to 2048 entries) are the useful range. Larger pages lower
//! the miss rate of the page lookup, smaller pages reclaim faster and
//! waste less on stragglers.

use std::mem;

/// Sentinel for an unmapped index.
pub const UNSET: i32 = -1;

/// A sparse `index -> slot` array split into lazily allocated pages.
#[derive(Debug)]
pub struct PageArray {
    /// `None` marks an absent page: every entry is implicitly [`UNSET`].
    pages: Vec<Option<Box<[i32]>>>,
    /// log2 of the page size.
    page_bits: u32,
}

impl PageArray {
    /// Create an empty index with pages of `1 << page_bits` entries.
    pub fn new(page_bits: u32) -> Self {
        Self {
            pages: Vec::new(),
            page_bits,
        }
    }

    /// Entries per page.
    #[inline]
    pub fn page_size(&self) -> usize {
        1 << self.page_bits
    }

    /// Number of page slots currently tracked (absent pages included).
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    #[inline]
    fn split(&self, index: usize) -> (usize, usize) {
        (index >> self.page_bits, index & (self.page_size() - 1))
    }

    /// Map `index` to `slot`, materializing the page if needed.
    ///
    /// Grows the page table to cover `index`; every page appended on the
    /// way stays absent.
    pub fn set(&mut self, index: usize, slot: i32) {
        let (page_idx, offset) = self.split(index);
        let page_size = self.page_size();
        if self.pages.len() <= page_idx {
            self.pages.resize_with(page_idx + 1, || None);
        }
        let page = self.pages[page_idx]
            .get_or_insert_with(|| vec![UNSET; page_size].into_boxed_slice());
        page[offset] = slot;
    }

    /// Unmap `index` without releasing any storage.
    ///
    /// No-op when the page is absent or `index` is beyond the page table.
    pub fn clear(&mut self, index: usize) {
        let (page_idx, offset) = self.split(index);
        if let Some(Some(page)) = self.pages.get_mut(page_idx) {
            page[offset] = UNSET;
        }
    }

    /// The slot mapped at `index`, or [`UNSET`].
    ///
    /// Never allocates; any out-of-range index reads as [`UNSET`].
    #[inline]
    pub fn at(&self, index: usize) -> i32 {
        let (page_idx, offset) = self.split(index);
        match self.pages.get(page_idx) {
            Some(Some(page)) => page[offset],
            _ => UNSET,
        }
    }

    /// Unmap `index` and release its page if that left the page empty.
    ///
    /// Costs a scan of one page; prefer [`clear`](Self::clear) on hot paths
    /// and reclaim in bulk with [`sweep`](Self::sweep).
    pub fn clear_and_reclaim(&mut self, index: usize) {
        let (page_idx, offset) = self.split(index);
        let Some(slot) = self.pages.get_mut(page_idx) else {
            return;
        };
        let Some(page) = slot else {
            return;
        };
        page[offset] = UNSET;
        if page.iter().all(|&s| s == UNSET) {
            *slot = None;
        }
    }

    /// Release every fully-empty page, then trim the trailing run of absent
    /// pages so the page table ends at the last occupied page.
    ///
    /// Costs a scan of every materialized page.
    pub fn sweep(&mut self) {
        let mut trailing = 0;
        for slot in self.pages.iter_mut() {
            match slot {
                None => trailing += 1,
                Some(page) => {
                    if page.iter().all(|&s| s == UNSET) {
                        *slot = None;
                        trailing += 1;
                    } else {
                        trailing = 0;
                    }
                }
            }
        }
        let keep = self.pages.len() - trailing;
        self.pages.truncate(keep);
    }

    /// Discard all pages unconditionally.
    pub fn reset(&mut self) {
        self.pages = Vec::new();
    }

    /// Bytes of heap memory owned by the index.
    ///
    /// Counts tracked page slots and materialized page storage; spare `Vec`
    /// capacity is not included, so sweeping an emptied index reports the
    /// same usage as a fresh one.
    pub fn mem_usage(&self) -> usize {
        let table = self.pages.len() * mem::size_of::<Option<Box<[i32]>>>();
        let materialized = self.pages.iter().filter(|p| p.is_some()).count();
        table + materialized * self.page_size() * mem::size_of::<i32>()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_at() {
        // Page size 8: index 16 lands on page 2.
        let mut pa = PageArray::new(3);
        pa.set(16, 5);
        assert_eq!(pa.at(16), 5);
        assert_eq!(pa.at(15), UNSET);
        assert_eq!(pa.page_count(), 3);
        pa.clear(16);
        assert_eq!(pa.at(16), UNSET);
        // clear does not free the page.
        assert_eq!(pa.page_count(), 3);
    }

    #[test]
    fn at_out_of_range_reads_unset() {
        let pa = PageArray::new(3);
        assert_eq!(pa.at(0), UNSET);
        assert_eq!(pa.at(1_000_000), UNSET);
    }

    #[test]
    fn intermediate_pages_stay_absent() {
        let mut pa = PageArray::new(3);
        pa.set(100, 1);
        let baseline = pa.mem_usage();
        // Pages 0..12 exist as slots but only page 12 is materialized.
        assert_eq!(pa.page_count(), 13);
        assert_eq!(
            baseline,
            13 * std::mem::size_of::<Option<Box<[i32]>>>() + 8 * std::mem::size_of::<i32>()
        );
    }

    #[test]
    fn clear_and_reclaim_frees_empty_page() {
        let mut pa = PageArray::new(3);
        pa.set(8, 0);
        pa.set(9, 1);
        let full = pa.mem_usage();
        pa.clear_and_reclaim(8);
        // Page still holds index 9.
        assert_eq!(pa.mem_usage(), full);
        assert_eq!(pa.at(9), 1);
        pa.clear_and_reclaim(9);
        // Page is gone, table length unchanged.
        assert_eq!(pa.page_count(), 2);
        assert_eq!(
            pa.mem_usage(),
            2 * std::mem::size_of::<Option<Box<[i32]>>>()
        );
    }

    #[test]
    fn sweep_restores_empty_baseline() {
        let mut pa = PageArray::new(10);
        let baseline = pa.mem_usage();
        pa.set(0, 0);
        pa.set(4096, 0);
        pa.clear(0);
        pa.clear(4096);
        assert_ne!(pa.mem_usage(), baseline);
        pa.sweep();
        assert_eq!(pa.mem_usage(), baseline);
        assert_eq!(pa.page_count(), 0);
    }

    #[test]
    fn sweep_keeps_occupied_pages() {
        let mut pa = PageArray::new(3);
        pa.set(0, 1);
        pa.set(20, 2);
        pa.clear(20);
        pa.sweep();
        assert_eq!(pa.at(0), 1);
        // Trailing pages (the emptied page 2 and absent page 1) are trimmed.
        assert_eq!(pa.page_count(), 1);
    }

    #[test]
    fn reset_discards_everything() {
        let mut pa = PageArray::new(3);
        pa.set(3, 7);
        pa.set(70, 9);
        pa.reset();
        assert_eq!(pa.page_count(), 0);
        assert_eq!(pa.at(3), UNSET);
        assert_eq!(pa.mem_usage(), 0);
    }
}
