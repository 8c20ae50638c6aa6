//! Scroll position of the conversation pane.
//!
//! The pane is anchored at a line offset from the top. Growth never moves it
//! by itself; the conversation schedules a deferred scroll that animates the
//! offset towards the bottom with a lerp chase. Any manual scroll cancels a
//! running animation.

/// Fraction of the remaining distance covered per animation step.
const SCROLL_LERP_FACTOR: f32 = 0.30;

/// Below this distance (in lines) the animation snaps to its target.
const SNAP_THRESHOLD: f32 = 0.5;

/// Animations further away than this jump most of the way first.
const INITIAL_JUMP_LINES: usize = 40;

/// Distance left to animate after an initial jump.
const JUMP_LANDING_LINES: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq)]
struct SmoothScroll {
    position: f32,
    target: usize,
}

#[derive(Debug, Clone, Default)]
pub struct ScrollState {
    offset: usize,
    animation: Option<SmoothScroll>,
    line_count: usize,
    viewport_height: usize,
}

impl ScrollState {
    /// Records the measured content and viewport sizes.
    ///
    /// The resting offset is clamped to the new extent; a running animation
    /// keeps the target it was started with.
    pub fn set_extent(&mut self, line_count: usize, viewport_height: usize) {
        self.line_count = line_count;
        self.viewport_height = viewport_height;
        self.offset = self.offset.min(self.max_offset());
    }

    pub fn line_count(&self) -> usize {
        self.line_count
    }

    pub fn viewport_height(&self) -> usize {
        self.viewport_height
    }

    /// Largest offset that still fills the viewport.
    pub fn max_offset(&self) -> usize {
        self.line_count.saturating_sub(self.viewport_height)
    }

    /// Offset of the first visible line.
    pub fn offset(&self) -> usize {
        match self.animation {
            Some(anim) => (anim.position.round().max(0.0) as usize).min(self.max_offset()),
            None => self.offset.min(self.max_offset()),
        }
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    pub fn is_at_bottom(&self) -> bool {
        self.offset() >= self.max_offset()
    }

    /// Moves towards `target`, animated when `smooth` is set.
    pub fn scroll_to(&mut self, target: usize, smooth: bool) {
        let current = self.offset();
        if !smooth || current == target {
            self.offset = target;
            self.animation = None;
            return;
        }

        let start = if target > current + INITIAL_JUMP_LINES {
            target - JUMP_LANDING_LINES
        } else if current > target + INITIAL_JUMP_LINES {
            target + JUMP_LANDING_LINES
        } else {
            current
        };
        self.offset = start;
        self.animation = Some(SmoothScroll {
            position: start as f32,
            target,
        });
    }

    /// Advances a running animation by one frame. Returns true while it is
    /// still running.
    pub fn step(&mut self) -> bool {
        let Some(mut anim) = self.animation else {
            return false;
        };
        let distance = anim.target as f32 - anim.position;
        if distance.abs() < SNAP_THRESHOLD {
            self.offset = anim.target;
            self.animation = None;
            return false;
        }
        anim.position += distance * SCROLL_LERP_FACTOR;
        self.animation = Some(anim);
        true
    }

    /// Stops the animation where it currently is.
    fn settle(&mut self) -> usize {
        let current = self.offset();
        self.animation = None;
        self.offset = current;
        current
    }

    pub fn scroll_up(&mut self, lines: usize) {
        let current = self.settle();
        self.offset = current.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        let current = self.settle();
        self.offset = (current + lines).min(self.max_offset());
    }

    pub fn page_up(&mut self) {
        self.scroll_up(self.viewport_height.max(1));
    }

    pub fn page_down(&mut self) {
        self.scroll_down(self.viewport_height.max(1));
    }

    pub fn scroll_to_top(&mut self) {
        self.settle();
        self.offset = 0;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.settle();
        self.offset = self.max_offset();
    }

    /// Scrolls the least amount needed to show lines `start..end`.
    pub fn reveal_lines(&mut self, start: usize, end: usize) {
        let current = self.offset();
        let height = self.viewport_height.max(1);
        if start < current {
            self.settle();
            self.offset = start;
        } else if end > current + height {
            self.settle();
            self.offset = end.saturating_sub(height).min(start).min(self.max_offset());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(lines: usize, height: usize) -> ScrollState {
        let mut s = ScrollState::default();
        s.set_extent(lines, height);
        s
    }

    fn run(s: &mut ScrollState) -> usize {
        let mut frames = 0;
        while s.step() {
            frames += 1;
            assert!(frames < 1000, "animation never settled");
        }
        frames
    }

    #[test]
    fn test_growth_does_not_move_offset() {
        let mut s = state(10, 5);
        s.scroll_to_top();
        s.set_extent(30, 5);
        assert_eq!(s.offset(), 0);
        assert!(!s.is_at_bottom());
    }

    #[test]
    fn test_smooth_scroll_reaches_target() {
        let mut s = state(30, 5);
        s.scroll_to(s.max_offset(), true);
        assert!(s.is_animating());

        let mut last = s.offset();
        while s.step() {
            assert!(s.offset() >= last);
            last = s.offset();
        }
        assert_eq!(s.offset(), 25);
        assert!(s.is_at_bottom());
    }

    #[test]
    fn test_far_scroll_jumps_close_first() {
        let mut s = state(500, 10);
        s.scroll_to(s.max_offset(), true);
        assert_eq!(s.offset(), 490 - JUMP_LANDING_LINES);
        run(&mut s);
        assert_eq!(s.offset(), 490);
    }

    #[test]
    fn test_instant_scroll_when_not_smooth() {
        let mut s = state(30, 5);
        s.scroll_to(25, false);
        assert!(!s.is_animating());
        assert_eq!(s.offset(), 25);
    }

    #[test]
    fn test_target_is_kept_when_content_grows_mid_animation() {
        let mut s = state(30, 5);
        s.scroll_to(25, true);
        s.step();
        s.set_extent(60, 5);
        run(&mut s);
        assert_eq!(s.offset(), 25);
    }

    #[test]
    fn test_manual_scroll_cancels_animation() {
        let mut s = state(30, 5);
        s.scroll_to(25, true);
        s.step();
        let at = s.offset();
        s.scroll_up(1);
        assert!(!s.is_animating());
        assert_eq!(s.offset(), at.saturating_sub(1));
    }

    #[test]
    fn test_scroll_down_clamps_to_bottom() {
        let mut s = state(12, 5);
        s.scroll_down(100);
        assert_eq!(s.offset(), 7);
        s.page_up();
        assert_eq!(s.offset(), 2);
    }

    #[test]
    fn test_reveal_lines_scrolls_minimally() {
        let mut s = state(40, 10);
        s.reveal_lines(12, 15);
        assert_eq!(s.offset(), 5);
        s.reveal_lines(2, 4);
        assert_eq!(s.offset(), 2);
        s.reveal_lines(3, 5);
        assert_eq!(s.offset(), 2);
    }
}
