//! Scratch buffer for child-list collection during parsing.
//!
//! List-producing productions (blocks, contract bodies, the source unit)
//! collect child node indices here before committing them to the extra-data
//! array in one contiguous run. Nesting works with explicit marks: an inner
//! production commits and truncates back to its own mark before the outer
//! production continues, so outer items below the mark are untouched.
//!
//! The backing storage is a `SmallVec` so small files never touch the heap
//! for list collection.

use smallvec::SmallVec;
use sol_ast::NodeIndex;

/// Position saved by [`ScratchBuffer::mark`].
#[derive(Clone, Copy, Debug)]
pub struct ScratchMark(usize);

/// Reusable buffer for temporary node-index lists.
///
/// Grows to the high-water mark of the deepest nesting and stays there.
#[derive(Debug, Default)]
pub struct ScratchBuffer {
    storage: SmallVec<[NodeIndex; 32]>,
}

impl ScratchBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Save the current position. Items pushed after this belong to the
    /// production that took the mark.
    #[inline]
    pub fn mark(&self) -> ScratchMark {
        ScratchMark(self.storage.len())
    }

    #[inline]
    pub fn push(&mut self, node: NodeIndex) {
        self.storage.push(node);
    }

    /// Items pushed since `mark`.
    #[inline]
    pub fn since(&self, mark: ScratchMark) -> &[NodeIndex] {
        &self.storage[mark.0..]
    }

    /// Number of items pushed since `mark`.
    #[inline]
    pub fn len_since(&self, mark: ScratchMark) -> usize {
        self.storage.len() - mark.0
    }

    /// Drop everything pushed since `mark`.
    #[inline]
    pub fn truncate_to(&mut self, mark: ScratchMark) {
        self.storage.truncate(mark.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn nested_marks() {
        let mut scratch = ScratchBuffer::new();
        let outer = scratch.mark();
        scratch.push(1);
        scratch.push(2);

        let inner = scratch.mark();
        scratch.push(10);
        scratch.push(11);
        assert_eq!(scratch.since(inner), &[10, 11]);
        scratch.truncate_to(inner);

        scratch.push(3);
        assert_eq!(scratch.since(outer), &[1, 2, 3]);
        assert_eq!(scratch.len_since(outer), 3);
        scratch.truncate_to(outer);
        assert_eq!(scratch.len_since(outer), 0);
    }
}
