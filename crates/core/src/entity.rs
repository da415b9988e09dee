//! Entity trait: identity by string id.

/// A record identified by a string id.
///
/// No uniqueness is enforced anywhere; lookups return the first match.
pub trait Entity {
    fn id(&self) -> &str;
}

/// First record in `items` whose id equals `id`.
pub fn find_by_id<'a, T: Entity>(items: &'a [T], id: &str) -> Option<&'a T> {
    items.iter().find(|item| item.id() == id)
}
