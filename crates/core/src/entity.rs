//! Things tracked by id rather than by value.

/// A product in the catalog or a line in the cart: two instances with the
/// same id are the same thing, whatever else differs.
pub trait Entity {
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug;

    fn id(&self) -> &Self::Id;
}
