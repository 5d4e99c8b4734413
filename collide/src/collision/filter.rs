use super::{
    settings::{DEFAULT_CATEGORY_BITS, DEFAULT_MASK_BITS},
    types::{BodyTag, FixtureFilter},
};
use crate::category::{Category, category_bits};

/// Category/mask filter applied by every query, plus one body to leave out.
///
/// A candidate passes when either direction matches:
/// `(candidate.mask & filter.mask) != 0 || (candidate.category & filter.category) != 0`.
/// This is an OR of the two directions, not the AND rapier's
/// `InteractionGroups` use.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QueryFilter {
    pub mask_bits: u16,
    pub category_bits: u16,
    /// Body whose fixtures are skipped by ray and swept queries.
    pub ignored: Option<BodyTag>,
}

impl Default for QueryFilter {
    fn default() -> Self {
        Self::new(DEFAULT_MASK_BITS, DEFAULT_CATEGORY_BITS)
    }
}

impl QueryFilter {
    #[inline]
    pub const fn new(mask_bits: u16, category_bits: u16) -> Self {
        Self {
            mask_bits,
            category_bits,
            ignored: None,
        }
    }

    /// Filter accepting fixtures whose mask names any of `categories`.
    pub fn for_categories<C: Category + Copy>(categories: &[C]) -> Self {
        Self::new(category_bits(categories), DEFAULT_CATEGORY_BITS)
    }

    #[inline]
    pub fn with_mask(mut self, mask_bits: u16) -> Self {
        self.mask_bits = mask_bits;
        self
    }

    #[inline]
    pub fn with_category(mut self, category_bits: u16) -> Self {
        self.category_bits = category_bits;
        self
    }

    #[inline]
    pub fn ignoring(mut self, body: BodyTag) -> Self {
        self.ignored = Some(body);
        self
    }

    /// Raw category/mask test against a candidate's mask and category bits.
    #[inline]
    pub fn test(&self, mask_bits: u16, category_bits: u16) -> bool {
        (mask_bits & self.mask_bits) != 0 || (category_bits & self.category_bits) != 0
    }

    #[inline]
    pub fn accepts(&self, fixture: &FixtureFilter) -> bool {
        self.test(fixture.mask_bits, fixture.category_bits)
    }

    /// True when `body` is the ignored body. Untagged bodies are never ignored.
    #[inline]
    pub fn ignores(&self, body: Option<BodyTag>) -> bool {
        matches!((self.ignored, body), (Some(ignored), Some(body)) if ignored == body)
    }
}
