//! Replay state for the play/pause control and the scrubber.
//!
//! [`Player`] owns the current timeline index and nothing else. It is driven by
//! the rendering layer: a timer calls [`Player::tick`], the scrubber calls
//! [`Player::seek`], and each data rebuild calls [`Player::set_len`].
//! The player never owns a timer itself; [`Player::tick_interval`] only tells
//! the caller how often to tick.
use std::time::Duration;

/// Interval between two automatic advances
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(500);

/// State of the replay
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PlayState {
    /// Not started, or nothing to play
    #[default]
    Idle,
    /// Advancing on each tick
    Playing,
    /// Stopped by the user or at the end of the timeline
    Paused,
    /// Torn down. Terminal state.
    Destroying,
}

/// Replay state machine over a timeline of `len` periods
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    state: PlayState,
    index: usize,
    len: usize,
    tick_interval: Duration,
}

impl Player {
    /// Create an idle player at index 0
    pub fn new(len: usize) -> Self {
        Player {
            state: PlayState::Idle,
            index: 0,
            len,
            tick_interval: DEFAULT_TICK_INTERVAL,
        }
    }

    /// Set the tick interval, returning self for chaining
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    /// Get the tick interval
    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    /// Get the current state
    pub fn state(&self) -> PlayState {
        self.state
    }

    /// Check whether ticks advance the index
    pub fn is_playing(&self) -> bool {
        self.state == PlayState::Playing
    }

    /// Get the current timeline index
    pub fn index(&self) -> usize {
        self.index
    }

    /// Get the timeline length
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check whether the timeline is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn last(&self) -> Option<usize> {
        self.len.checked_sub(1)
    }

    /// Start playing.
    /// If the current index is the last period, playing restarts from the first one.
    /// Returns false if there is nothing to play or the player is destroyed.
    pub fn play(&mut self) -> bool {
        if self.state == PlayState::Destroying {
            return false;
        }
        let Some(last) = self.last() else {
            return false;
        };
        // a single period has nothing to advance to
        if last == 0 {
            return false;
        }
        if self.index >= last {
            self.index = 0;
        }
        self.state = PlayState::Playing;
        true
    }

    /// Pause if playing
    pub fn pause(&mut self) {
        if self.state == PlayState::Playing {
            self.state = PlayState::Paused;
        }
    }

    /// Play if not playing, pause otherwise.
    /// Returns whether the player is playing afterwards.
    pub fn toggle(&mut self) -> bool {
        if self.is_playing() {
            self.pause();
            false
        } else {
            self.play()
        }
    }

    /// Advance one period if playing.
    ///
    /// Reaching the last period pauses the player.
    /// Returns the new index, or None if nothing changed.
    pub fn tick(&mut self) -> Option<usize> {
        if !self.is_playing() {
            return None;
        }
        let last = self.last()?;
        if self.index >= last {
            self.state = PlayState::Paused;
            return None;
        }
        self.index += 1;
        if self.index == last {
            self.state = PlayState::Paused;
        }
        Some(self.index)
    }

    /// Move to the given index, clamped into the timeline.
    /// Playing continues from there.
    /// Returns the new index, or None if the timeline is empty or the player destroyed.
    pub fn seek(&mut self, index: usize) -> Option<usize> {
        if self.state == PlayState::Destroying {
            return None;
        }
        let last = self.last()?;
        self.index = index.min(last);
        Some(self.index)
    }

    /// Update the timeline length after a data rebuild.
    ///
    /// The index is clamped into the new bounds. A playing player that ends up on
    /// the last period pauses, as on [`Player::tick`]. An empty timeline stops the player.
    pub fn set_len(&mut self, len: usize) {
        if self.state == PlayState::Destroying {
            return;
        }
        self.len = len;
        match self.last() {
            None => {
                self.index = 0;
                self.state = PlayState::Idle;
            }
            Some(last) => {
                self.index = self.index.min(last);
                if self.state == PlayState::Playing && self.index == last {
                    self.state = PlayState::Paused;
                }
            }
        }
    }

    /// Tear the player down. Every later call is a no-op.
    pub fn destroy(&mut self) {
        log::trace!("destroying player at index {}/{}", self.index, self.len);
        self.state = PlayState::Destroying;
    }
}
