//! A random-access sequence that supports cheap insertion and removal at any
//! position.
//!
//! Elements live in a list of pages. Each page knows the absolute position of
//! its first element (its shift), so locating a position is a binary search
//! over pages, and an insert or remove only moves elements inside one page
//! plus bumps the shift of the pages after it.

use std::fmt;

use thiserror::Error;
use tracing::debug;

pub const DEFAULT_MAX_PAGE_SIZE: usize = 512;
pub const DEFAULT_MIN_LOAD_SIZE: usize = DEFAULT_MAX_PAGE_SIZE / 6;

// How many mutations between load reports.
const REPORT_EVERY: u32 = 100_000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("max page size must be at least 1")]
    ZeroPageSize,
    #[error("min load size {min} exceeds max page size {max}")]
    MinLoadAboveMax { min: usize, max: usize },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PositionError {
    #[error("insertion position (is {pos}) should be <= len (is {len})")]
    InsertOutOfRange { pos: usize, len: usize },
    #[error("removal position (is {pos}) should be < len (is {len})")]
    RemoveOutOfRange { pos: usize, len: usize },
}

/// Page size bounds. A page is split once it holds more than
/// `max_page_size` elements and merged into a neighbour once it holds fewer
/// than `min_load_size`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageConfig {
    max_page_size: usize,
    min_load_size: usize,
}

impl PageConfig {
    pub fn new(max_page_size: usize, min_load_size: usize) -> Result<Self, ConfigError> {
        if max_page_size == 0 {
            return Err(ConfigError::ZeroPageSize);
        }
        if min_load_size > max_page_size {
            return Err(ConfigError::MinLoadAboveMax {
                min: min_load_size,
                max: max_page_size,
            });
        }
        Ok(PageConfig { max_page_size, min_load_size })
    }

    pub fn max_page_size(&self) -> usize {
        self.max_page_size
    }

    pub fn min_load_size(&self) -> usize {
        self.min_load_size
    }
}

impl Default for PageConfig {
    fn default() -> Self {
        PageConfig {
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
            min_load_size: DEFAULT_MIN_LOAD_SIZE,
        }
    }
}

#[derive(Clone)]
struct Page<T> {
    shift: usize,
    data: Vec<T>,
}

impl<T> Page<T> {
    fn new(shift: usize, data: Vec<T>) -> Self {
        Page { shift, data }
    }

    fn end(&self) -> usize {
        self.shift + self.data.len()
    }
}

#[derive(Clone)]
pub struct PagedSeq<T> {
    // Never empty. pages[i + 1].shift == pages[i].end() for all i.
    pages: Vec<Page<T>>,
    config: PageConfig,
    ops: u32,
}

impl<T> PagedSeq<T> {
    pub fn new() -> Self {
        Self::with_config(PageConfig::default())
    }

    pub fn with_config(config: PageConfig) -> Self {
        PagedSeq {
            pages: vec![Page::new(0, Vec::new())],
            config,
            ops: 0,
        }
    }

    pub fn config(&self) -> PageConfig {
        self.config
    }

    pub fn len(&self) -> usize {
        self.pages.last().map_or(0, Page::end)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Average number of elements per page.
    pub fn load_factor(&self) -> f64 {
        self.len() as f64 / self.pages.len() as f64
    }

    /// `(shift, len)` of every page, in order.
    pub fn page_layout(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.pages.iter().map(|p| (p.shift, p.data.len()))
    }

    pub fn get(&self, pos: usize) -> Option<&T> {
        if pos >= self.len() {
            return None;
        }
        let page = &self.pages[self.page_index(pos)];
        page.data.get(pos - page.shift)
    }

    /// Inserts `value` so that it ends up at position `pos`.
    ///
    /// # Panics
    ///
    /// Panics if `pos > len`.
    pub fn insert_at(&mut self, pos: usize, value: T) {
        if let Err(err) = self.try_insert_at(pos, value) {
            panic!("{}", err);
        }
    }

    /// Removes and returns the element at position `pos`.
    ///
    /// # Panics
    ///
    /// Panics if `pos >= len`.
    pub fn remove_at(&mut self, pos: usize) -> T {
        match self.try_remove_at(pos) {
            Ok(value) => value,
            Err(err) => panic!("{}", err),
        }
    }

    pub fn push_back(&mut self, value: T) {
        let len = self.len();
        self.insert_at(len, value);
    }

    pub fn try_insert_at(&mut self, pos: usize, value: T) -> Result<(), PositionError> {
        let len = self.len();
        if pos > len {
            return Err(PositionError::InsertOutOfRange { pos, len });
        }
        let idx = self.page_index(pos);
        let page = &mut self.pages[idx];
        page.data.insert(pos - page.shift, value);
        let oversized = page.data.len() > self.config.max_page_size;
        for later in &mut self.pages[idx + 1..] {
            later.shift += 1;
        }
        if oversized {
            self.split(idx);
        }
        self.count_op();
        Ok(())
    }

    pub fn try_remove_at(&mut self, pos: usize) -> Result<T, PositionError> {
        let len = self.len();
        if pos >= len {
            return Err(PositionError::RemoveOutOfRange { pos, len });
        }
        let idx = self.page_index(pos);
        let page = &mut self.pages[idx];
        let value = page.data.remove(pos - page.shift);
        let underloaded = page.data.len() < self.config.min_load_size;
        for later in &mut self.pages[idx + 1..] {
            later.shift -= 1;
        }
        if underloaded && self.pages.len() > 1 {
            self.merge(idx);
        }
        self.count_op();
        Ok(value)
    }

    pub fn fold<A, F>(&self, init: A, mut f: F) -> A
    where
        F: FnMut(A, &T) -> A,
    {
        let mut acc = init;
        for page in &self.pages {
            for item in &page.data {
                acc = f(acc, item);
            }
        }
        acc
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            pages: self.pages.iter(),
            cur: Default::default(),
        }
    }

    // Index of the last page whose shift is <= pos. Page 0 always has shift
    // 0, so this can't underflow, and pos == len lands on the last page.
    fn page_index(&self, pos: usize) -> usize {
        self.pages.partition_point(|p| p.shift <= pos) - 1
    }

    fn split(&mut self, idx: usize) {
        let page = &mut self.pages[idx];
        let stays = page.data.len() / 2;
        let moved = page.data.split_off(stays);
        let new_page = Page::new(page.shift + stays, moved);
        self.pages.insert(idx + 1, new_page);
    }

    // The merged page may end up over max_page_size. It gets split by the next
    // insert that lands on it.
    fn merge(&mut self, idx: usize) {
        if idx + 1 < self.pages.len() {
            let right = self.pages.remove(idx + 1);
            self.pages[idx].data.extend(right.data);
        } else {
            let page = self.pages.remove(idx);
            self.pages[idx - 1].data.extend(page.data);
        }
    }

    fn count_op(&mut self) {
        self.ops = (self.ops + 1) % REPORT_EVERY;
        if self.ops != 0 {
            return;
        }
        debug!(
            len = self.len(),
            pages = self.pages.len(),
            load_factor = self.load_factor(),
            "paged sequence load"
        );
    }
}

impl<T> Default for PagedSeq<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for PagedSeq<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> Extend<T> for PagedSeq<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for v in iter {
            self.push_back(v);
        }
    }
}

impl<T> FromIterator<T> for PagedSeq<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut seq = PagedSeq::new();
        seq.extend(iter);
        seq
    }
}

impl<'a, T> IntoIterator for &'a PagedSeq<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct Iter<'a, T> {
    pages: std::slice::Iter<'a, Page<T>>,
    cur: std::slice::Iter<'a, T>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.cur.next() {
                return Some(item);
            }
            self.cur = self.pages.next()?.data.iter();
        }
    }
}
