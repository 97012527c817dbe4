use firewall_types::Position;

/// Outcome of advancing an enemy along the path for one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathProgress {
    /// Still travelling between waypoints.
    Advanced,
    /// The enemy sits on the final waypoint; it has escaped the defenses.
    ReachedEnd,
}

/// Fixed ordered waypoint polyline enemies walk along. The same geometry
/// is handed to the rendering scene, so indices are stable for a run.
#[derive(Clone, Debug, Default)]
pub struct Path {
    waypoints: Vec<Position>,
}

impl Path {
    pub fn new(waypoints: Vec<Position>) -> Self {
        Self { waypoints }
    }

    pub fn waypoints(&self) -> &[Position] {
        &self.waypoints
    }

    /// Entry point for spawned enemies.
    pub fn start(&self) -> Option<Position> {
        self.waypoints.first().copied()
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Move `pos` by up to `step` grid units toward successive waypoints,
    /// starting from segment `path_index`. Consumes corners within a single
    /// tick, so fast enemies do not stall on short segments.
    ///
    /// Returns the new position, the new waypoint index, and whether the
    /// enemy is done with the path.
    pub fn advance(
        &self,
        pos: Position,
        path_index: usize,
        step: f32,
    ) -> (Position, usize, PathProgress) {
        let mut pos = pos;
        let mut index = path_index;
        let mut remaining = step;

        loop {
            if index + 1 >= self.waypoints.len() {
                return (pos, index, PathProgress::ReachedEnd);
            }
            if remaining <= 0.0 {
                return (pos, index, PathProgress::Advanced);
            }

            let target = self.waypoints[index + 1];
            let dist = pos.distance(target);

            if dist <= remaining {
                pos = target;
                index += 1;
                remaining -= dist;
            } else {
                let t = remaining / dist;
                pos = Position::new(pos.x + (target.x - pos.x) * t, pos.y + (target.y - pos.y) * t);
                return (pos, index, PathProgress::Advanced);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path() -> Path {
        Path::new(vec![
            Position::new(0.0, 0.0),
            Position::new(4.0, 0.0),
            Position::new(4.0, 3.0),
        ])
    }

    #[test]
    fn advances_toward_next_waypoint() {
        let p = path();
        let (pos, index, progress) = p.advance(Position::new(0.0, 0.0), 0, 1.5);
        assert_eq!(pos, Position::new(1.5, 0.0));
        assert_eq!(index, 0);
        assert_eq!(progress, PathProgress::Advanced);
    }

    #[test]
    fn consumes_corner_within_one_step() {
        let p = path();
        // 1 unit left on the first segment, 1 unit onto the second.
        let (pos, index, progress) = p.advance(Position::new(3.0, 0.0), 0, 2.0);
        assert_eq!(pos, Position::new(4.0, 1.0));
        assert_eq!(index, 1);
        assert_eq!(progress, PathProgress::Advanced);
    }

    #[test]
    fn reports_end_at_final_waypoint() {
        let p = path();
        let (pos, index, progress) = p.advance(Position::new(4.0, 3.0), 2, 1.0);
        assert_eq!(pos, Position::new(4.0, 3.0));
        assert_eq!(index, 2);
        assert_eq!(progress, PathProgress::ReachedEnd);
    }

    #[test]
    fn overshoot_lands_on_end() {
        let p = path();
        // More than the remaining path length; the walk stops on the last
        // waypoint and reports the end in the same call.
        let (pos, index, progress) = p.advance(Position::new(3.5, 0.0), 0, 100.0);
        assert_eq!(pos, Position::new(4.0, 3.0));
        assert_eq!(index, 2);
        assert_eq!(progress, PathProgress::ReachedEnd);
    }

    #[test]
    fn empty_path_is_terminal() {
        let p = Path::new(Vec::new());
        assert!(p.is_empty());
        let (_, _, progress) = p.advance(Position::new(0.0, 0.0), 0, 1.0);
        assert_eq!(progress, PathProgress::ReachedEnd);
    }
}
