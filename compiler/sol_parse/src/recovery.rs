//! Error recovery for the parser.
//!
//! Provides token sets and synchronization for continuing parsing after
//! errors. Membership testing is a bitset operation over the `TokenTag`
//! discriminant, so recovery scans are O(1) per token.

use sol_ast::TokenTag;

/// A set of token tags using a `u128` bitset.
///
/// Each bit corresponds to a `TokenTag` discriminant index; the tag count
/// is below 128 by construction (asserted in `sol_ast`'s tests).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenSet(u128);

impl TokenSet {
    /// Create an empty token set.
    #[inline]
    pub const fn new() -> Self {
        Self(0)
    }

    /// Add a token tag (builder pattern for const contexts).
    #[inline]
    #[must_use]
    pub const fn with(self, tag: TokenTag) -> Self {
        Self(self.0 | (1u128 << tag.discriminant_index()))
    }

    /// Union of two token sets.
    #[inline]
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Check if this set contains a token tag.
    #[inline]
    pub const fn contains(&self, tag: TokenTag) -> bool {
        (self.0 & (1u128 << tag.discriminant_index())) != 0
    }

    /// Number of tags in this set.
    #[inline]
    pub const fn count(&self) -> u32 {
        self.0.count_ones()
    }
}

impl Default for TokenSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Tags that start an elementary type — shared by several boundary sets,
/// since declarations commonly begin with a type token.
const TYPE_START: TokenSet = TokenSet::new()
    .with(TokenTag::AddressType)
    .with(TokenTag::BoolType)
    .with(TokenTag::StringType)
    .with(TokenTag::BytesType)
    .with(TokenTag::UintType)
    .with(TokenTag::IntType)
    .with(TokenTag::UintSized)
    .with(TokenTag::IntSized)
    .with(TokenTag::BytesSized);

/// Recovery set for top-level declaration boundaries.
pub const DECL_BOUNDARY: TokenSet = TokenSet::new()
    .with(TokenTag::Pragma)
    .with(TokenTag::Import)
    .with(TokenTag::Using)
    .with(TokenTag::Abstract)
    .with(TokenTag::Contract)
    .with(TokenTag::Interface)
    .with(TokenTag::Library)
    .with(TokenTag::Struct)
    .with(TokenTag::Enum)
    .with(TokenTag::Error)
    .with(TokenTag::Event)
    .with(TokenTag::Function)
    .with(TokenTag::Mapping)
    .with(TokenTag::Semicolon)
    .with(TokenTag::Eof);

/// Recovery set for contract body element boundaries.
pub const MEMBER_BOUNDARY: TokenSet = TYPE_START
    .with(TokenTag::Function)
    .with(TokenTag::Modifier)
    .with(TokenTag::Constructor)
    .with(TokenTag::Fallback)
    .with(TokenTag::Receive)
    .with(TokenTag::Event)
    .with(TokenTag::Error)
    .with(TokenTag::Struct)
    .with(TokenTag::Enum)
    .with(TokenTag::Mapping)
    .with(TokenTag::Using)
    .with(TokenTag::Semicolon)
    .with(TokenTag::RBrace)
    .with(TokenTag::Eof);

/// Recovery set for statement boundaries inside a block.
pub const STMT_BOUNDARY: TokenSet = TokenSet::new()
    .with(TokenTag::Semicolon)
    .with(TokenTag::LBrace)
    .with(TokenTag::RBrace)
    .with(TokenTag::If)
    .with(TokenTag::For)
    .with(TokenTag::While)
    .with(TokenTag::Do)
    .with(TokenTag::Return)
    .with(TokenTag::Break)
    .with(TokenTag::Continue)
    .with(TokenTag::Emit)
    .with(TokenTag::Revert)
    .with(TokenTag::Try)
    .with(TokenTag::Unchecked)
    .with(TokenTag::Assembly)
    .with(TokenTag::Eof);

/// Recovery set for list elements (parameters, arguments, fields).
pub const LIST_BOUNDARY: TokenSet = TokenSet::new()
    .with(TokenTag::Comma)
    .with(TokenTag::RParen)
    .with(TokenTag::RBrace)
    .with(TokenTag::RBracket)
    .with(TokenTag::Semicolon)
    .with(TokenTag::Eof);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_set() {
        let set = TokenSet::new();
        assert_eq!(set.count(), 0);
        assert!(!set.contains(TokenTag::Contract));
    }

    #[test]
    fn with_and_contains() {
        let set = TokenSet::new()
            .with(TokenTag::Semicolon)
            .with(TokenTag::RBrace);
        assert_eq!(set.count(), 2);
        assert!(set.contains(TokenTag::Semicolon));
        assert!(set.contains(TokenTag::RBrace));
        assert!(!set.contains(TokenTag::Comma));
    }

    #[test]
    fn union_merges() {
        let a = TokenSet::new().with(TokenTag::If);
        let b = TokenSet::new().with(TokenTag::For).with(TokenTag::If);
        let union = a.union(b);
        assert_eq!(union.count(), 2);
        assert!(union.contains(TokenTag::If));
        assert!(union.contains(TokenTag::For));
    }

    #[test]
    fn boundary_sets_cover_expected_tags() {
        assert!(DECL_BOUNDARY.contains(TokenTag::Contract));
        assert!(DECL_BOUNDARY.contains(TokenTag::Eof));
        assert!(MEMBER_BOUNDARY.contains(TokenTag::UintSized));
        assert!(MEMBER_BOUNDARY.contains(TokenTag::RBrace));
        assert!(STMT_BOUNDARY.contains(TokenTag::Semicolon));
        assert!(!STMT_BOUNDARY.contains(TokenTag::Plus));
        assert!(LIST_BOUNDARY.contains(TokenTag::Comma));
    }
}
