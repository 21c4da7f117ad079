use smallvec::SmallVec;

use crate::Range;

/// The window's selection: an ordered list of (static) ranges.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
	ranges: SmallVec<[Range; 1]>,
}

impl Selection {
	pub fn range_count(&self) -> usize {
		self.ranges.len()
	}

	pub fn range_at(&self, index: usize) -> Option<Range> {
		self.ranges.get(index).copied()
	}

	pub fn remove_all_ranges(&mut self) {
		self.ranges.clear();
	}

	pub fn add_range(&mut self, range: Range) {
		self.ranges.push(range);
	}

	pub fn is_collapsed(&self) -> bool {
		self.ranges.first().is_none_or(Range::is_collapsed)
	}

	pub(crate) fn retain(&mut self, mut keep: impl FnMut(&Range) -> bool) {
		self.ranges.retain(|r| keep(r));
	}
}
