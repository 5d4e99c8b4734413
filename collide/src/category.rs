/// Storage for fixture and filter category words.
pub type CategoryContainer = u16;

/// Trait implemented by user-defined category enums.
///
/// The enum's discriminant (via `#[repr(u8)]`) determines the bit index, so a
/// category enum can name at most 16 categories.
pub trait Category {
    fn bit_index(&self) -> u8;

    fn bits(&self) -> CategoryContainer {
        debug_assert!(self.bit_index() < 16, "category bit index out of range");
        1 << self.bit_index()
    }
}

/// Combine several categories into one category or mask word.
pub fn category_bits<C: Category + Copy>(categories: &[C]) -> CategoryContainer {
    categories.iter().fold(0, |acc, c| acc | c.bits())
}

/// A category word that can be built up and queried one category at a time.
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq)]
pub struct CategorySet {
    pub bits: CategoryContainer,
}

impl CategorySet {
    pub fn new(bits: CategoryContainer) -> Self {
        Self { bits }
    }

    pub fn add<C: Category>(&mut self, category: C) {
        self.bits |= category.bits();
    }

    pub fn remove<C: Category>(&mut self, category: C) {
        self.bits &= !category.bits();
    }

    pub fn has<C: Category>(&self, category: C) -> bool {
        (self.bits & category.bits()) != 0
    }

    pub fn has_any<C: Category + Copy>(&self, categories: &[C]) -> bool {
        (self.bits & category_bits(categories)) != 0
    }
}

impl From<CategorySet> for CategoryContainer {
    fn from(set: CategorySet) -> Self {
        set.bits
    }
}

/// Declare a category enum and implement `Category` for it.
///
/// Example:
/// ```rust
/// collide::define_categories!(Layer, {
///     World,
///     Player,
///     Projectile,
/// });
/// ```
#[macro_export]
macro_rules! define_categories {
    ($name:ident, { $($variant:ident),* $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        #[repr(u8)]
        pub enum $name {
            $($variant),*
        }

        impl $crate::category::Category for $name {
            fn bit_index(&self) -> u8 {
                *self as u8
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    define_categories!(Layer, {
        World,
        Player,
        Projectile,
    });

    #[test]
    fn discriminant_selects_bit() {
        assert_eq!(Layer::World.bits(), 0b001);
        assert_eq!(Layer::Player.bits(), 0b010);
        assert_eq!(Layer::Projectile.bits(), 0b100);
        assert_eq!(category_bits(&[Layer::World, Layer::Projectile]), 0b101);
        assert_eq!(category_bits::<Layer>(&[]), 0);
    }

    #[test]
    fn category_set_add_remove() {
        let mut set = CategorySet::default();
        set.add(Layer::Player);
        set.add(Layer::Projectile);
        assert!(set.has(Layer::Player));
        assert!(!set.has(Layer::World));
        assert!(set.has_any(&[Layer::World, Layer::Projectile]));

        set.remove(Layer::Player);
        assert!(!set.has(Layer::Player));
        assert_eq!(u16::from(set), Layer::Projectile.bits());
    }
}
