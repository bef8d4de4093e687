//! Ordered ground markers and the length of the path through them.

use glam::Vec3;

/// A click closer than this to an existing marker removes it instead of
/// adding a new one.
pub const PIN_PICK_RADIUS: f32 = 0.5;

/// What a [`MeasurementStore::toggle_at`] call did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Toggle {
    /// Appended at this index.
    Added(usize),
    /// Removed the marker that was at this index and position.
    Removed(usize, Vec3),
}

/// Sum of the distances between consecutive points.
pub fn path_length(points: &[Vec3]) -> f32 {
    points.windows(2).map(|w| w[0].distance(w[1])).sum()
}

#[derive(Debug, Clone, Default)]
pub struct MeasurementStore {
    points: Vec<Vec3>,
    total_length: f32,
}

impl MeasurementStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes the first marker within [`PIN_PICK_RADIUS`] of `point`, or
    /// appends `point` when none is that close.
    pub fn toggle_at(&mut self, point: Vec3) -> Toggle {
        let near = self
            .points
            .iter()
            .position(|p| p.distance(point) < PIN_PICK_RADIUS);

        let outcome = match near {
            Some(index) => Toggle::Removed(index, self.points.remove(index)),
            None => {
                self.points.push(point);
                Toggle::Added(self.points.len() - 1)
            }
        };

        self.recompute();
        outcome
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.recompute();
    }

    fn recompute(&mut self) {
        self.total_length = path_length(&self.points);
    }

    #[inline]
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    #[inline]
    pub fn total_length(&self) -> f32 {
        self.total_length
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last(&self) -> Option<Vec3> {
        self.points.last().copied()
    }

    /// Distance of each consecutive pair, in sequence order.
    pub fn segment_lengths(&self) -> impl Iterator<Item = f32> + '_ {
        self.points.windows(2).map(|w| w[0].distance(w[1]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn store_with(points: &[Vec3]) -> MeasurementStore {
        let mut store = MeasurementStore::new();
        for &p in points {
            assert!(matches!(store.toggle_at(p), Toggle::Added(_)));
        }
        store
    }

    #[test]
    fn empty_and_single_marker_have_zero_length() {
        let mut store = MeasurementStore::new();
        assert_eq!(store.total_length(), 0.0);
        store.toggle_at(Vec3::new(1.0, 0.0, 1.0));
        assert_eq!(store.len(), 1);
        assert_eq!(store.total_length(), 0.0);
    }

    #[test]
    fn toggle_twice_restores_previous_state() {
        let mut store = store_with(&[Vec3::new(-3.0, 0.0, 0.0), Vec3::new(2.0, 0.0, 4.0)]);
        let before_points = store.points().to_vec();
        let before_len = store.total_length();

        let p = Vec3::new(6.0, 0.0, -1.0);
        assert_eq!(store.toggle_at(p), Toggle::Added(2));
        assert_eq!(store.toggle_at(p), Toggle::Removed(2, p));

        assert_eq!(store.points(), before_points.as_slice());
        assert!((store.total_length() - before_len).abs() < EPS);
    }

    #[test]
    fn click_inside_radius_removes_marker() {
        let m = Vec3::new(1.0, 0.0, 1.0);
        let mut store = store_with(&[m, Vec3::new(5.0, 0.0, 1.0)]);

        let outcome = store.toggle_at(m + Vec3::new(0.3, 0.0, 0.3));
        assert_eq!(outcome, Toggle::Removed(0, m));
        assert_eq!(store.points(), &[Vec3::new(5.0, 0.0, 1.0)]);
        assert_eq!(store.total_length(), 0.0);
    }

    #[test]
    fn click_at_radius_appends() {
        let m = Vec3::ZERO;
        let mut store = store_with(&[m]);

        let p = Vec3::new(PIN_PICK_RADIUS, 0.0, 0.0);
        assert_eq!(store.toggle_at(p), Toggle::Added(1));
        assert_eq!(store.len(), 2);
        assert!((store.total_length() - PIN_PICK_RADIUS).abs() < EPS);
    }

    #[test]
    fn removes_first_match_in_insertion_order() {
        let a = Vec3::new(0.0, 0.0, 0.0);
        let b = Vec3::new(0.6, 0.0, 0.0);
        let mut store = store_with(&[a, b]);

        // Within radius of both; the earlier marker goes.
        let outcome = store.toggle_at(Vec3::new(0.3, 0.0, 0.0));
        assert_eq!(outcome, Toggle::Removed(0, a));
        assert_eq!(store.points(), &[b]);
    }

    #[test]
    fn removing_middle_marker_reconnects_neighbours() {
        let mut store = store_with(&[
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(3.0, 0.0, 0.0),
            Vec3::new(3.0, 0.0, 4.0),
        ]);
        assert!((store.total_length() - 7.0).abs() < EPS);

        store.toggle_at(Vec3::new(3.0, 0.0, 0.0));
        assert!((store.total_length() - 5.0).abs() < EPS);
    }

    #[test]
    fn appending_adds_last_segment() {
        let mut store = store_with(&[Vec3::new(-2.0, 0.0, 1.0), Vec3::new(4.0, 0.0, 1.0)]);
        let before = store.total_length();
        let last = store.last().unwrap();

        let new = Vec3::new(1.0, 0.0, -3.0);
        store.toggle_at(new);
        assert!((store.total_length() - (before + last.distance(new))).abs() < EPS);
    }

    #[test]
    fn total_matches_segment_sum() {
        let store = store_with(&[
            Vec3::new(-9.0, 0.0, -9.0),
            Vec3::new(2.5, 0.0, -1.0),
            Vec3::new(7.0, 0.0, 8.0),
            Vec3::new(-4.0, 0.0, 6.5),
        ]);
        let sum: f32 = store.segment_lengths().sum();
        assert!((store.total_length() - sum).abs() < EPS);
        assert!((store.total_length() - path_length(store.points())).abs() < EPS);
        assert_eq!(store.segment_lengths().count(), 3);
    }

    #[test]
    fn three_collinear_points_five_apart() {
        let store = store_with(&[
            Vec3::new(-5.0, 0.0, 2.0),
            Vec3::new(0.0, 0.0, 2.0),
            Vec3::new(5.0, 0.0, 2.0),
        ]);
        assert_eq!(store.len(), 3);
        assert!((store.total_length() - 10.0).abs() < EPS);
    }

    #[test]
    fn clear_resets_length() {
        let mut store = store_with(&[Vec3::ZERO, Vec3::X * 4.0]);
        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.total_length(), 0.0);
    }
}
