//! Selectable items arranged on a ring.

use std::f32::consts::TAU;
use std::fmt;

/// Stable identity of one item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(pub u32);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One entry on the ring.  `payload` is opaque to the interaction core.
#[derive(Clone, Debug, PartialEq)]
pub struct Item<P> {
    pub id:      ItemId,
    /// Position on the ring in radians, 0 at the front.
    pub angle:   f32,
    pub payload: P,
}

/// Owns every item for its whole lifetime.
#[derive(Clone, Debug)]
pub struct ItemRing<P> {
    items: Vec<Item<P>>,
}

impl<P> ItemRing<P> {
    /// Place `payloads` evenly around the ring, ids `1..=n`.
    pub fn evenly_spaced(payloads: impl IntoIterator<Item = P>) -> Self {
        let payloads: Vec<P> = payloads.into_iter().collect();
        let n = payloads.len().max(1) as f32;
        let items = payloads
            .into_iter()
            .enumerate()
            .map(|(i, payload)| Item {
                id:    ItemId(i as u32 + 1),
                angle: i as f32 / n * TAU,
                payload,
            })
            .collect();
        ItemRing { items }
    }

    pub fn get(&self, id: ItemId) -> Option<&Item<P>> {
        self.items.iter().find(|it| it.id == id)
    }

    pub fn contains(&self, id: ItemId) -> bool { self.get(id).is_some() }
    pub fn ids(&self) -> impl Iterator<Item = ItemId> + '_ { self.items.iter().map(|it| it.id) }
    pub fn iter(&self) -> std::slice::Iter<'_, Item<P>> { self.items.iter() }
    pub fn len(&self) -> usize { self.items.len() }
    pub fn is_empty(&self) -> bool { self.items.is_empty() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn even_spacing_and_ids() {
        let ring = ItemRing::evenly_spaced(["a", "b", "c", "d"]);
        assert_eq!(ring.len(), 4);
        let angles: Vec<f32> = ring.iter().map(|it| it.angle).collect();
        assert_eq!(angles[0], 0.0);
        assert!((angles[1] - TAU / 4.0).abs() < 1e-6);
        assert_eq!(ring.ids().collect::<Vec<_>>(), vec![ItemId(1), ItemId(2), ItemId(3), ItemId(4)]);
        assert_eq!(ring.get(ItemId(3)).map(|it| it.payload), Some("c"));
        assert!(!ring.contains(ItemId(0)));
    }

    #[test]
    fn empty_ring() {
        let ring: ItemRing<()> = ItemRing::evenly_spaced(Vec::new());
        assert!(ring.is_empty());
        assert_eq!(ring.ids().count(), 0);
    }
}
