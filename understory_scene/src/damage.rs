// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Repaint regions returned by [`Scene::tick`](crate::Scene::tick).

use alloc::vec::Vec;
use kurbo::Rect;

/// Viewport-space rectangles that changed since the previous tick.
#[derive(Clone, Debug, Default)]
pub struct Damage {
    /// Rectangles that should be repainted.
    pub dirty_rects: Vec<Rect>,
}

impl Damage {
    /// True if nothing changed.
    pub fn is_empty(&self) -> bool {
        self.dirty_rects.is_empty()
    }

    /// Returns the union of all damage rects.
    pub fn union_rect(&self) -> Option<Rect> {
        let mut it = self.dirty_rects.iter().copied();
        let first = it.next()?;
        Some(it.fold(first, |acc, r| acc.union(r)))
    }

    /// Record the old and new extent of something that changed.
    ///
    /// Degenerate rects are dropped; identical pairs collapse to one entry.
    pub(crate) fn push_pair(&mut self, old: Option<Rect>, new: Option<Rect>) {
        let old = old.filter(|r| !r.is_zero_area());
        let new = new.filter(|r| !r.is_zero_area());
        match (old, new) {
            (Some(a), Some(b)) if a == b => self.dirty_rects.push(a),
            (a, b) => self.dirty_rects.extend(a.into_iter().chain(b)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_damage_has_no_union() {
        let d = Damage::default();
        assert!(d.is_empty());
        assert!(d.union_rect().is_none());
    }

    #[test]
    fn pair_drops_zero_area_and_duplicates() {
        let mut d = Damage::default();
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        d.push_pair(Some(r), Some(r));
        d.push_pair(Some(Rect::new(5.0, 5.0, 5.0, 9.0)), Some(Rect::new(20.0, 0.0, 30.0, 5.0)));
        assert_eq!(d.dirty_rects.len(), 2);
        assert_eq!(d.union_rect(), Some(Rect::new(0.0, 0.0, 30.0, 10.0)));
    }
}
