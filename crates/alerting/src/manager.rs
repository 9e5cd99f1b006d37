//! Alert Manager Implementation

use tracing::{debug, warn};

use crate::player::{AudioPlayer, SilentPlayer};

/// Gates alert playback so a clip is never restarted while it is audible.
///
/// Callers raise the alert on every frame the condition holds; the manager
/// only reaches the player when it is idle.
pub struct AlertManager {
    /// Audio output
    player: Box<dyn AudioPlayer>,
    /// Number of times `play` was issued
    fire_count: usize,
    /// Raises absorbed because the clip was still playing
    suppressed_count: usize,
}

impl AlertManager {
    /// Create a new alert manager around a player
    pub fn new(player: Box<dyn AudioPlayer>) -> Self {
        Self {
            player,
            fire_count: 0,
            suppressed_count: 0,
        }
    }

    /// Manager that never makes a sound
    pub fn silent() -> Self {
        Self::new(Box::new(SilentPlayer))
    }

    /// Request the alert. Returns true when playback was started.
    pub fn raise(&mut self) -> bool {
        if self.player.is_playing() {
            self.suppressed_count += 1;
            debug!("Alert already sounding");
            return false;
        }

        self.player.play();
        self.fire_count += 1;
        warn!("Drowsiness alert sounding (count: {})", self.fire_count);
        true
    }

    /// Whether the alert clip is currently audible
    pub fn is_sounding(&self) -> bool {
        self.player.is_playing()
    }

    /// Number of times playback was started
    pub fn fire_count(&self) -> usize {
        self.fire_count
    }

    /// Number of raises absorbed by an audible clip
    pub fn suppressed_count(&self) -> usize {
        self.suppressed_count
    }

    /// Clear counters (on driver change)
    pub fn clear(&mut self) {
        self.fire_count = 0;
        self.suppressed_count = 0;
    }
}

impl Default for AlertManager {
    fn default() -> Self {
        Self::silent()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Plays until told to stop
    struct LatchedPlayer {
        playing: Rc<Cell<bool>>,
        plays: Rc<Cell<usize>>,
    }

    impl AudioPlayer for LatchedPlayer {
        fn is_playing(&self) -> bool {
            self.playing.get()
        }

        fn play(&mut self) {
            self.playing.set(true);
            self.plays.set(self.plays.get() + 1);
        }
    }

    fn latched() -> (AlertManager, Rc<Cell<bool>>, Rc<Cell<usize>>) {
        let playing = Rc::new(Cell::new(false));
        let plays = Rc::new(Cell::new(0));
        let manager = AlertManager::new(Box::new(LatchedPlayer {
            playing: playing.clone(),
            plays: plays.clone(),
        }));
        (manager, playing, plays)
    }

    #[test]
    fn test_no_overlapping_playback() {
        let (mut manager, _playing, plays) = latched();

        assert!(manager.raise());
        for _ in 0..10 {
            assert!(!manager.raise());
        }

        assert_eq!(plays.get(), 1);
        assert_eq!(manager.fire_count(), 1);
        assert_eq!(manager.suppressed_count(), 10);
        assert!(manager.is_sounding());
    }

    #[test]
    fn test_replays_after_clip_ends() {
        let (mut manager, playing, plays) = latched();

        assert!(manager.raise());
        playing.set(false);
        assert!(manager.raise());

        assert_eq!(plays.get(), 2);
        assert_eq!(manager.suppressed_count(), 0);
    }

    #[test]
    fn test_silent_manager_always_fires() {
        let mut manager = AlertManager::default();
        assert!(manager.raise());
        assert!(manager.raise());
        assert!(!manager.is_sounding());
        assert_eq!(manager.fire_count(), 2);

        manager.clear();
        assert_eq!(manager.fire_count(), 0);
        assert_eq!(manager.suppressed_count(), 0);
    }
}
