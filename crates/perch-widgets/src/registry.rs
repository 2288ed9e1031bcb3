#![forbid(unsafe_code)]

//! Tooltip targets and where they are on screen.
//!
//! Targets register on mount and re-register on every render; registration
//! is an upsert keyed by identity that keeps first-registration order.
//! Their rectangles come from the host through [`AnchorLookup`], usually a
//! [`ResolvedRects`] map fed by the host's layout pass.

use std::hash::Hash;

use ahash::AHashMap;
use perch_core::Rect;
use perch_layout::PreferredSide;

/// A target that can show a tooltip.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetRegistration<K> {
    pub id: K,
    /// Label shown in the bubble.
    pub text: String,
    pub preferred: PreferredSide,
    /// Gap override; `None` uses the overlay default.
    pub gap: Option<f64>,
}

impl<K> TargetRegistration<K> {
    pub fn new(id: K, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            preferred: PreferredSide::Auto,
            gap: None,
        }
    }

    #[must_use]
    pub fn preferred(mut self, preferred: impl Into<PreferredSide>) -> Self {
        self.preferred = preferred.into();
        self
    }

    #[must_use]
    pub fn gap(mut self, gap: f64) -> Self {
        self.gap = Some(gap);
        self
    }
}

/// Registered targets in first-registration order.
#[derive(Debug, Clone)]
pub struct TargetRegistry<K> {
    entries: Vec<TargetRegistration<K>>,
    index: AHashMap<K, usize>,
}

impl<K> Default for TargetRegistry<K> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: AHashMap::new(),
        }
    }
}

impl<K: Clone + Eq + Hash> TargetRegistry<K> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the registration for `registration.id`.
    ///
    /// Returns `true` if the identity was new.
    pub fn upsert(&mut self, registration: TargetRegistration<K>) -> bool {
        if let Some(&slot) = self.index.get(&registration.id) {
            self.entries[slot] = registration;
            false
        } else {
            self.index
                .insert(registration.id.clone(), self.entries.len());
            self.entries.push(registration);
            true
        }
    }

    /// Remove a target. Returns its registration if it was present.
    pub fn unregister(&mut self, id: &K) -> Option<TargetRegistration<K>> {
        let slot = self.index.remove(id)?;
        let removed = self.entries.remove(slot);
        for entry in &self.entries[slot..] {
            if let Some(i) = self.index.get_mut(&entry.id) {
                *i -= 1;
            }
        }
        Some(removed)
    }

    pub fn get(&self, id: &K) -> Option<&TargetRegistration<K>> {
        self.index.get(id).map(|&slot| &self.entries[slot])
    }

    #[inline]
    pub fn contains(&self, id: &K) -> bool {
        self.index.contains_key(id)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }
}

impl<K> TargetRegistry<K> {
    /// Registrations in first-registration order.
    pub fn iter(&self) -> impl Iterator<Item = &TargetRegistration<K>> {
        self.entries.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Resolves a target identity to its rectangle in container coordinates.
pub trait AnchorLookup<K> {
    fn anchor(&self, id: &K) -> Option<Rect>;
}

impl<K, F> AnchorLookup<K> for F
where
    F: Fn(&K) -> Option<Rect>,
{
    fn anchor(&self, id: &K) -> Option<Rect> {
        self(id)
    }
}

/// Target rectangles reported by the host's layout pass.
#[derive(Debug, Clone)]
pub struct ResolvedRects<K> {
    rects: AHashMap<K, Rect>,
}

impl<K> Default for ResolvedRects<K> {
    fn default() -> Self {
        Self {
            rects: AHashMap::new(),
        }
    }
}

impl<K: Eq + Hash> ResolvedRects<K> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: K, rect: Rect) -> Option<Rect> {
        self.rects.insert(id, rect)
    }

    /// Fold a batch of updates in; later entries win.
    pub fn merge<I>(&mut self, batch: I)
    where
        I: IntoIterator<Item = (K, Rect)>,
    {
        self.rects.extend(batch);
    }

    pub fn remove(&mut self, id: &K) -> Option<Rect> {
        self.rects.remove(id)
    }

    pub fn get(&self, id: &K) -> Option<&Rect> {
        self.rects.get(id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rects.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    pub fn clear(&mut self) {
        self.rects.clear();
    }
}

impl<K: Eq + Hash> AnchorLookup<K> for ResolvedRects<K> {
    fn anchor(&self, id: &K) -> Option<Rect> {
        self.rects.get(id).copied()
    }
}

impl<K: Eq + Hash> FromIterator<(K, Rect)> for ResolvedRects<K> {
    fn from_iter<I: IntoIterator<Item = (K, Rect)>>(iter: I) -> Self {
        let mut rects = Self::new();
        rects.merge(iter);
        rects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use perch_layout::Side;

    #[test]
    fn upsert_keeps_registration_order() {
        let mut reg = TargetRegistry::new();
        assert!(reg.upsert(TargetRegistration::new("a", "first")));
        assert!(reg.upsert(TargetRegistration::new("b", "second")));
        assert!(!reg.upsert(TargetRegistration::new("a", "renamed").preferred(Side::Top)));

        let ids: Vec<_> = reg.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["a", "b"]);
        let a = reg.get(&"a").unwrap();
        assert_eq!(a.text, "renamed");
        assert_eq!(a.preferred, PreferredSide::Top);
    }

    #[test]
    fn unregister_reindexes_followers() {
        let mut reg = TargetRegistry::new();
        for id in 0..4 {
            reg.upsert(TargetRegistration::new(id, format!("t{id}")));
        }
        assert_eq!(reg.unregister(&1).map(|r| r.text), Some("t1".to_string()));
        assert!(reg.unregister(&1).is_none());
        assert_eq!(reg.len(), 3);
        assert_eq!(reg.get(&3).unwrap().text, "t3");
        assert_eq!(reg.get(&2).unwrap().text, "t2");
        assert!(!reg.contains(&1));
    }

    #[test]
    fn registration_builder() {
        let r = TargetRegistration::new(7u32, "Save").preferred(Side::Leading).gap(4.0);
        assert_eq!(r.preferred, PreferredSide::Leading);
        assert_eq!(r.gap, Some(4.0));
        assert_eq!(TargetRegistration::new(1u32, "x").gap, None);
    }

    #[test]
    fn merge_is_last_write_wins() {
        let mut rects = ResolvedRects::new();
        rects.insert("a", Rect::new(0.0, 0.0, 10.0, 10.0));
        rects.merge([
            ("a", Rect::new(1.0, 1.0, 10.0, 10.0)),
            ("b", Rect::new(5.0, 5.0, 2.0, 2.0)),
            ("a", Rect::new(2.0, 2.0, 10.0, 10.0)),
        ]);
        assert_eq!(rects.anchor(&"a"), Some(Rect::new(2.0, 2.0, 10.0, 10.0)));
        assert_eq!(rects.len(), 2);
        assert_eq!(rects.anchor(&"c"), None);
    }

    #[test]
    fn closures_are_lookups() {
        let lookup = |id: &u8| (*id == 1).then(|| Rect::new(0.0, 0.0, 4.0, 4.0));
        assert!(lookup.anchor(&1).is_some());
        assert!(lookup.anchor(&2).is_none());
    }
}
