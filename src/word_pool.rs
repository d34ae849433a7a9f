use crate::geometry::{PlayField, Point, Rect};
use rand::seq::SliceRandom;
use rand::Rng;
use unicode_width::UnicodeWidthStr;

/// Candidate rows tried before settling for the least crowded one
pub const MAX_PLACEMENT_ATTEMPTS: usize = 64;

/// One vocabulary entry and where it currently is on the field
#[derive(Debug, Clone, PartialEq)]
pub struct WordSlot {
    pub text: String,
    pub bounds: Rect,
    pub active: bool,
    pub finished: bool,
}

impl WordSlot {
    fn new(text: String, field: &PlayField) -> Self {
        let w = text.width() as f64 * field.glyph_width;
        Self {
            text,
            bounds: Rect::new(-w, 0.0, w, field.line_height),
            active: false,
            finished: false,
        }
    }

    /// On the field and still waiting to be typed
    pub fn is_live(&self) -> bool {
        self.active && !self.finished
    }

    fn park(&mut self) {
        self.bounds = self.bounds.at(Point::new(-self.bounds.w, 0.0));
        self.active = false;
        self.finished = false;
    }
}

/// Owns the shuffled vocabulary for one match
#[derive(Debug, Clone)]
pub struct WordPool {
    slots: Vec<WordSlot>,
}

impl WordPool {
    pub fn new<R: Rng + ?Sized>(words: &[String], field: &PlayField, rng: &mut R) -> Self {
        let mut slots: Vec<WordSlot> = words
            .iter()
            .map(|w| WordSlot::new(w.clone(), field))
            .collect();
        slots.shuffle(rng);
        Self { slots }
    }

    /// Reshuffle and take every word off the field
    pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.slots.shuffle(rng);
        self.slots.iter_mut().for_each(WordSlot::park);
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slots(&self) -> &[WordSlot] {
        &self.slots
    }

    pub fn get(&self, index: usize) -> Option<&WordSlot> {
        self.slots.get(index)
    }

    pub fn live_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_live())
            .map(|(i, _)| i)
    }

    /// Put a word on the field. Already active slots are left alone.
    pub fn activate(&mut self, index: usize, position: Point) {
        if let Some(slot) = self.slots.get_mut(index) {
            if slot.active {
                return;
            }
            slot.bounds = slot.bounds.at(position);
            slot.active = true;
        }
    }

    /// Finish the first live word equal to `text`, ignoring case.
    /// Pool order decides between duplicates.
    pub fn resolve_submission(&mut self, text: &str) -> Option<usize> {
        if text.is_empty() {
            return None;
        }
        let needle = text.to_lowercase();
        let index = self
            .slots
            .iter()
            .position(|s| s.is_live() && s.text.to_lowercase() == needle)?;
        self.slots[index].finished = true;
        Some(index)
    }

    pub fn advance(&mut self, index: usize, delta_x: f64) {
        if let Some(slot) = self.slots.get_mut(index) {
            if slot.is_live() {
                slot.bounds.x += delta_x;
            }
        }
    }

    /// Whether a live word has left the right edge of the field
    pub fn has_exited(&self, index: usize, field: &PlayField) -> bool {
        self.slots
            .get(index)
            .is_some_and(|s| s.is_live() && s.bounds.x > field.width)
    }

    /// Rectangles of every live word except `index`
    pub fn active_bounds_except(&self, index: usize) -> Vec<Rect> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(i, s)| *i != index && s.is_live())
            .map(|(_, s)| s.bounds)
            .collect()
    }

    /// Move a word back to the left edge on a row clear of `avoid`.
    ///
    /// Rows are drawn at random; after `MAX_PLACEMENT_ATTEMPTS` misses the
    /// candidate with the smallest total overlap is used.
    pub fn respawn_within_bounds<R: Rng + ?Sized>(
        &mut self,
        index: usize,
        avoid: &[Rect],
        field: &PlayField,
        rng: &mut R,
    ) -> Point {
        let Some(slot) = self.slots.get_mut(index) else {
            return Point::default();
        };
        let (top, bottom) = field.spawn_rows();
        let x = -slot.bounds.w;

        let mut best: Option<(Point, f64)> = None;
        for _ in 0..MAX_PLACEMENT_ATTEMPTS {
            let candidate = Point::new(x, rng.gen_range(top..=bottom) as f64);
            let rect = slot.bounds.at(candidate);
            let overlap: f64 = avoid.iter().map(|r| rect.overlap_area(r)).sum();
            if overlap == 0.0 {
                best = Some((candidate, overlap));
                break;
            }
            if best.map_or(true, |(_, o)| overlap < o) {
                best = Some((candidate, overlap));
            }
        }

        let (position, overlap) = best.unwrap_or((Point::new(x, top as f64), 0.0));
        if overlap > 0.0 {
            log::debug!(
                "no free row for {:?}, placing with overlap {:.0}",
                slot.text,
                overlap
            );
        }
        slot.bounds = slot.bounds.at(position);
        position
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    fn pool(list: &[&str]) -> (WordPool, StdRng) {
        let mut rng = StdRng::seed_from_u64(7);
        let pool = WordPool::new(&words(list), &PlayField::default(), &mut rng);
        (pool, rng)
    }

    fn index_of(pool: &WordPool, text: &str) -> usize {
        pool.slots().iter().position(|s| s.text == text).unwrap()
    }

    #[test]
    fn test_new_pool_keeps_every_word_parked() {
        let (pool, _) = pool(&["cat", "dog", "bird"]);
        assert_eq!(pool.len(), 3);
        for slot in pool.slots() {
            assert!(!slot.active);
            assert!(!slot.finished);
            assert_eq!(slot.bounds.x, -slot.bounds.w);
            assert_eq!(slot.bounds.h, 30.0);
        }
        assert_eq!(pool.slots()[index_of(&pool, "bird")].bounds.w, 48.0);
    }

    #[test]
    fn test_activate_sets_position_once() {
        let (mut pool, _) = pool(&["cat"]);
        pool.activate(0, Point::new(-36.0, 100.0));
        assert!(pool.slots()[0].active);
        assert_eq!(pool.slots()[0].bounds.y, 100.0);

        pool.activate(0, Point::new(-36.0, 300.0));
        assert_eq!(pool.slots()[0].bounds.y, 100.0);
    }

    #[test]
    fn test_activate_out_of_range_is_ignored() {
        let (mut pool, _) = pool(&["cat"]);
        pool.activate(5, Point::new(0.0, 0.0));
        assert!(!pool.slots()[0].active);
    }

    #[test]
    fn test_resolve_submission_is_case_insensitive() {
        let (mut pool, _) = pool(&["cat", "dog"]);
        let cat = index_of(&pool, "cat");
        pool.activate(cat, Point::new(0.0, 50.0));

        assert_eq!(pool.resolve_submission("CAT"), Some(cat));
        assert!(pool.slots()[cat].finished);
        assert_eq!(pool.resolve_submission("cat"), None);
    }

    #[test]
    fn test_resolve_submission_requires_exact_match() {
        let (mut pool, _) = pool(&["cat"]);
        pool.activate(0, Point::new(0.0, 50.0));
        assert_eq!(pool.resolve_submission("ca"), None);
        assert_eq!(pool.resolve_submission("cats"), None);
        assert_eq!(pool.resolve_submission(""), None);
        assert!(!pool.slots()[0].finished);
    }

    #[test]
    fn test_resolve_submission_ignores_inactive_words() {
        let (mut pool, _) = pool(&["cat"]);
        assert_eq!(pool.resolve_submission("cat"), None);
    }

    #[test]
    fn test_duplicate_words_resolve_in_pool_order() {
        let (mut pool, _) = pool(&["echo", "echo"]);
        pool.activate(1, Point::new(0.0, 50.0));
        pool.activate(0, Point::new(0.0, 200.0));
        assert_eq!(pool.resolve_submission("echo"), Some(0));
        assert_eq!(pool.resolve_submission("echo"), Some(1));
    }

    #[test]
    fn test_advance_moves_only_live_words() {
        let (mut pool, _) = pool(&["cat", "dog"]);
        pool.activate(0, Point::new(0.0, 50.0));
        pool.advance(0, 12.5);
        pool.advance(1, 12.5);
        assert_eq!(pool.slots()[0].bounds.x, 12.5);
        assert_eq!(pool.slots()[1].bounds.x, -pool.slots()[1].bounds.w);
    }

    #[test]
    fn test_has_exited_past_right_edge() {
        let field = PlayField::default();
        let (mut pool, _) = pool(&["cat"]);
        pool.activate(0, Point::new(790.0, 50.0));
        assert!(!pool.has_exited(0, &field));
        pool.advance(0, 10.0);
        assert!(!pool.has_exited(0, &field));
        pool.advance(0, 0.5);
        assert!(pool.has_exited(0, &field));
    }

    #[test]
    fn test_respawn_avoids_live_words() {
        let field = PlayField::default();
        let (mut pool, mut rng) = pool(&["alpha", "beta", "gamma", "delta", "omega"]);
        for i in 0..pool.len() {
            let avoid = pool.active_bounds_except(i);
            let p = pool.respawn_within_bounds(i, &avoid, &field, &mut rng);
            pool.activate(i, p);
        }
        let live: Vec<Rect> = pool.slots().iter().map(|s| s.bounds).collect();
        for (i, a) in live.iter().enumerate() {
            assert!(a.y >= 20.0 && a.y <= 530.0);
            assert_eq!(a.x, -a.w);
            for b in live.iter().skip(i + 1) {
                assert!(!a.intersects(b), "{a:?} overlaps {b:?}");
            }
        }
    }

    #[test]
    fn test_respawn_terminates_on_saturated_field() {
        let field = PlayField::default();
        let (mut pool, mut rng) = pool(&["cat"]);
        // a wall covering every spawn row
        let wall = [Rect::new(-100.0, 0.0, 200.0, 600.0)];
        let p = pool.respawn_within_bounds(0, &wall, &field, &mut rng);
        assert!(p.y >= 20.0 && p.y <= 530.0);
        assert_eq!(pool.slots()[0].bounds.origin(), p);
    }

    #[test]
    fn test_respawn_prefers_least_overlap() {
        // only rows 20..=22 exist and all of them touch the block; 22 overlaps least
        let field = PlayField {
            height: 92.0,
            ..PlayField::default()
        };
        let (mut pool, mut rng) = pool(&["cat"]);
        let block = [Rect::new(-100.0, 0.0, 200.0, 51.5)];
        let p = pool.respawn_within_bounds(0, &block, &field, &mut rng);
        assert_eq!(p.y, 22.0);
    }

    #[test]
    fn test_active_bounds_skip_finished_and_self() {
        let (mut pool, _) = pool(&["cat", "dog", "eel"]);
        pool.activate(0, Point::new(0.0, 40.0));
        pool.activate(1, Point::new(0.0, 80.0));
        pool.activate(2, Point::new(0.0, 120.0));
        let text = pool.slots()[1].text.clone();
        pool.resolve_submission(&text);

        let avoid = pool.active_bounds_except(0);
        assert_eq!(avoid.len(), 1);
        assert_eq!(avoid[0].y, 120.0);
    }

    #[test]
    fn test_reset_parks_all_slots() {
        let (mut pool, mut rng) = pool(&["cat", "dog"]);
        pool.activate(0, Point::new(100.0, 40.0));
        let text = pool.slots()[0].text.clone();
        pool.resolve_submission(&text);
        pool.reset(&mut rng);
        assert!(pool.slots().iter().all(|s| !s.active && !s.finished));
        assert!(pool.slots().iter().all(|s| s.bounds.x == -s.bounds.w));
        assert_eq!(pool.live_indices().count(), 0);
    }
}
