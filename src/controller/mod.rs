// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Player controller.
//!
//! The [`PlayerController`] reconciles user actions (next, previous,
//! play/pause, seek, wheel gestures, carousel moves) with the carousel and
//! the external player. It is the sole writer of [`PlayerState`].
//!
//! # Ground truth
//!
//! The external player is authoritative for playback state. The controller
//! optimistically marks a track as loading when it asks for it, and every
//! notification from the player then corrects that projection.
//!
//! # Failures
//!
//! Player calls may fail while the embed is initialising. Such failures are
//! never surfaced: the most recent failed command is parked in a single
//! deferred slot and retried on the next notification from the player. With
//! an empty track list every command is a no-op.

pub(crate) mod gesture;
pub(crate) mod palette;

use std::time::Instant;

use tracing::{debug, info};

use crate::{
    carousel::Carousel,
    controller::{
        gesture::{Direction, GestureAccumulator, GestureConfig},
        palette::Palette,
    },
    model::Track,
    player::{AdapterError, EmbedState, PlaybackBackend, PlayerNotification},
    poller::FramePoller,
};

/// Receives notifications about the derived effects of navigation.
pub(crate) trait ControllerDelegate {
    fn on_active_track_changed(&self, index: usize, track: &Track);
}

/// Playback status as a tagged variant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum PlaybackStatus {
    #[default]
    Idle,
    Loading,
    Playing,
    Paused,
    Ended,
}

/// Inputs to the [`PlaybackStatus`] transition table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Signal {
    Load,
    Reported(EmbedState),
    Reset,
}

impl PlaybackStatus {
    pub(crate) fn transition(self, signal: Signal) -> Self {
        use PlaybackStatus::*;

        match (self, signal) {
            (_, Signal::Reset) => Idle,
            (_, Signal::Load) => Loading,
            (_, Signal::Reported(EmbedState::Playing)) => Playing,
            (_, Signal::Reported(EmbedState::Paused)) => Paused,
            (_, Signal::Reported(EmbedState::Ended)) => Ended,
            (Idle, Signal::Reported(EmbedState::Unstarted)) => Idle,
            (Loading | Playing | Paused | Ended, Signal::Reported(EmbedState::Unstarted)) => {
                Loading
            }
        }
    }

    pub(crate) fn is_playing(self) -> bool {
        matches!(self, Self::Loading | Self::Playing)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct PlayerState {
    pub(crate) active_index: usize,
    pub(crate) status: PlaybackStatus,
    pub(crate) progress_seconds: f64,
    pub(crate) duration_seconds: f64,
}

impl PlayerState {
    pub(crate) fn is_playing(&self) -> bool {
        self.status.is_playing()
    }

    /// Progress as a fraction of the duration, when the duration is known.
    pub(crate) fn ratio(&self) -> Option<f64> {
        (self.duration_seconds > 0.0).then(|| self.progress_seconds / self.duration_seconds)
    }

    fn set_progress(&mut self, seconds: f64, duration: f64) {
        self.duration_seconds = duration.max(0.0);
        self.progress_seconds = if self.duration_seconds > 0.0 {
            seconds.clamp(0.0, self.duration_seconds)
        } else {
            seconds.max(0.0)
        };
    }
}

/// A player command parked after a failure, retried on the next notification.
///
/// Loads carry the track id, so a parked load survives a revalidation that
/// moves its track.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Deferred {
    Load(String),
    Play,
    Pause,
    Seek(f64),
}

pub(crate) struct PlayerController<P: PlaybackBackend, D: ControllerDelegate> {
    tracks: Vec<Track>,
    state: PlayerState,
    initial_slide: usize,

    player: P,
    delegate: D,

    carousel: Carousel,
    gesture: GestureAccumulator,
    palette: Option<Palette>,

    deferred: Option<Deferred>,
    poller: Option<FramePoller>,
    disposed: bool,
}

impl<P: PlaybackBackend, D: ControllerDelegate> PlayerController<P, D> {
    pub(crate) fn new(player: P, delegate: D, gesture: GestureConfig, initial_slide: usize) -> Self {
        Self {
            tracks: vec![],
            state: PlayerState::default(),
            initial_slide,
            player,
            delegate,
            carousel: Carousel::new(),
            gesture: GestureAccumulator::new(gesture),
            palette: None,
            deferred: None,
            poller: None,
            disposed: false,
        }
    }

    pub(crate) fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub(crate) fn state(&self) -> &PlayerState {
        &self.state
    }

    pub(crate) fn current_track(&self) -> Option<&Track> {
        self.tracks.get(self.state.active_index)
    }

    pub(crate) fn carousel(&self) -> &Carousel {
        &self.carousel
    }

    pub(crate) fn palette(&self) -> Option<&Palette> {
        self.palette.as_ref()
    }

    pub(crate) fn deferred(&self) -> Option<&Deferred> {
        self.deferred.as_ref()
    }

    /// Takes ownership of the frame loop, so that [`Self::dispose`] can stop
    /// it.
    pub(crate) fn attach_poller(&mut self, poller: FramePoller) {
        if let Some(mut old) = self.poller.replace(poller) {
            old.cancel();
        }
    }

    /// Installs a (re)fetched track list.
    ///
    /// The first non-empty list mounts the player on the initial slide and
    /// starts playback. Later lists keep the current track if it survived,
    /// without interrupting it.
    pub(crate) fn set_tracks(&mut self, tracks: Vec<Track>) {
        if self.disposed {
            return;
        }

        let current_id = self.current_track().map(|t| t.id.clone());
        let was_mounted = current_id.is_some();
        self.tracks = tracks;

        if self.tracks.is_empty() {
            info!("Track list is empty, nothing to play");
            self.state = PlayerState::default();
            self.carousel.reset(0, 0);
            self.deferred = None;
            return;
        }

        let surviving = current_id.and_then(|id| self.tracks.iter().position(|t| t.id == id));

        match surviving {
            Some(index) => {
                debug!(index, "Current track kept after revalidation");
                self.state.active_index = index;
                self.carousel.reset(self.tracks.len(), index);
            }
            None => {
                // The active track is gone, and its colours with it
                self.palette = None;
                let index = if was_mounted {
                    self.state.active_index.min(self.tracks.len() - 1)
                } else {
                    self.initial_slide.min(self.tracks.len() - 1)
                };
                self.carousel.reset(self.tracks.len(), index);
                self.load(index);
                self.command(Deferred::Play);
            }
        }
    }

    pub(crate) fn next(&mut self) {
        if self.tracks.is_empty() {
            return;
        }
        let index = (self.state.active_index + 1) % self.tracks.len();
        self.go_to(index);
    }

    pub(crate) fn prev(&mut self) {
        if self.tracks.is_empty() {
            return;
        }
        let len = self.tracks.len();
        let index = (self.state.active_index + len - 1) % len;
        self.go_to(index);
    }

    /// Navigates to an explicit track, keeping the carousel in step.
    pub(crate) fn go_to(&mut self, index: usize) {
        if self.disposed || index >= self.tracks.len() {
            return;
        }
        self.load(index);
        self.carousel.slide_to(index);
    }

    /// Toggles playback based on what the player reports, not the local
    /// projection, which may have drifted.
    pub(crate) fn play_pause(&mut self) {
        if self.disposed || self.tracks.is_empty() {
            return;
        }

        match self.player.state() {
            Ok(EmbedState::Playing) => self.command(Deferred::Pause),
            Ok(_) => self.command(Deferred::Play),
            Err(e) => {
                debug!("Play/pause deferred: {}", e);
                self.deferred = Some(if self.state.is_playing() {
                    Deferred::Pause
                } else {
                    Deferred::Play
                });
            }
        }
    }

    /// Seeks within the current track, never changing the active index.
    pub(crate) fn seek_to(&mut self, seconds: f64) {
        if self.disposed || self.tracks.is_empty() {
            return;
        }

        let seconds = if self.state.duration_seconds > 0.0 {
            seconds.clamp(0.0, self.state.duration_seconds)
        } else {
            seconds.max(0.0)
        };

        self.command(Deferred::Seek(seconds));
        if self.deferred.is_none() {
            let duration = self.state.duration_seconds;
            self.state.set_progress(seconds, duration);
        }
    }

    pub(crate) fn seek_by(&mut self, delta: f64) {
        let current = self
            .player
            .current_time()
            .unwrap_or(self.state.progress_seconds);
        self.seek_to(current + delta);
    }

    /// Seeks to a fraction of the track, as from scrubbing a progress bar.
    pub(crate) fn scrub(&mut self, ratio: f64) {
        if self.state.duration_seconds > 0.0 {
            self.seek_to(ratio.clamp(0.0, 1.0) * self.state.duration_seconds);
        }
    }

    /// Applies a notification from the player, in arrival order.
    pub(crate) fn handle_notification(&mut self, notification: PlayerNotification) {
        if self.disposed {
            return;
        }

        self.player.observe(&notification);

        match notification {
            PlayerNotification::Ready => self.retry_deferred(),
            PlayerNotification::StateChanged(EmbedState::Ended) => {
                self.state.status = self.state.status.transition(Signal::Reported(EmbedState::Ended));
                self.deferred = None;
                self.next();
            }
            PlayerNotification::StateChanged(state) => {
                self.state.status = self.state.status.transition(Signal::Reported(state));
                self.retry_deferred();
            }
            PlayerNotification::TimeChanged(_) | PlayerNotification::DurationChanged(_) => {}
        }
    }

    /// Carousel driven navigation, from the user dragging or clicking.
    pub(crate) fn on_slide_changed(&mut self, index: usize) {
        if self.disposed || index >= self.tracks.len() || index == self.state.active_index {
            return;
        }
        self.load(index);
    }

    pub(crate) fn drag_carousel(&mut self, step: isize) {
        if let Some(index) = self.carousel.drag(step) {
            self.on_slide_changed(index);
        }
    }

    pub(crate) fn click_slide(&mut self, index: usize) {
        if let Some(index) = self.carousel.click(index) {
            self.on_slide_changed(index);
        }
    }

    /// Feeds a wheel delta through the gesture accumulator.
    pub(crate) fn on_wheel(&mut self, delta_y: f64, now: Instant) {
        if self.tracks.len() <= 1 {
            return;
        }

        match self.gesture.push(delta_y, now) {
            Some(Direction::Forward) => self.next(),
            Some(Direction::Backward) => self.prev(),
            None => debug!(accumulated = self.gesture.accumulated(), "Wheel below threshold"),
        }
    }

    /// Polls the player for progress, once per frame.
    pub(crate) fn poll_progress(&mut self) {
        let (Ok(current), Ok(duration)) = (self.player.current_time(), self.player.duration())
        else {
            return;
        };

        if duration > 0.0 {
            self.state.set_progress(current, duration);
        }
    }

    /// Advances the per-frame animations.
    pub(crate) fn on_frame(&mut self) {
        self.poll_progress();
        if self.carousel.is_animating() {
            self.carousel.advance();
        }
    }

    /// Installs a sampled palette, unless it belongs to a track that is no
    /// longer active.
    pub(crate) fn apply_palette(&mut self, index: usize, palette: Palette) -> bool {
        if index != self.state.active_index || self.tracks.is_empty() {
            return false;
        }
        self.palette = Some(palette);
        true
    }

    /// Releases the frame loop and the player. Idempotent.
    pub(crate) fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;

        if let Some(mut poller) = self.poller.take() {
            if !poller.is_running() {
                debug!("Frame loop already stopped");
            }
            poller.cancel();
        }
        self.player.destroy();
        self.deferred = None;
        self.state.status = self.state.status.transition(Signal::Reset);
    }

    // Makes `index` the active track and asks the player for it.
    fn load(&mut self, index: usize) {
        let changed = index != self.state.active_index || self.palette.is_none();

        self.state.active_index = index;
        self.state.status = self.state.status.transition(Signal::Load);
        self.state.set_progress(0.0, 0.0);

        if let Some(track) = self.tracks.get(index) {
            self.command(Deferred::Load(track.id.clone()));
        }

        if changed {
            self.palette = None;
        }
        if let Some(track) = self.tracks.get(index) {
            self.delegate.on_active_track_changed(index, track);
        }
    }

    // Issues a command, parking it in the deferred slot on failure.
    fn command(&mut self, command: Deferred) {
        if self.disposed {
            return;
        }

        match self.issue(&command) {
            Ok(()) => {
                if self.deferred.as_ref() == Some(&command) {
                    self.deferred = None;
                }
            }
            Err(e) => {
                debug!(?command, "Player command deferred: {}", e);
                self.deferred = Some(command);
            }
        }
    }

    fn issue(&mut self, command: &Deferred) -> Result<(), AdapterError> {
        match command {
            Deferred::Load(id) => self.player.load_track(id),
            Deferred::Play => self.player.play(),
            Deferred::Pause => self.player.pause(),
            Deferred::Seek(seconds) => self.player.seek_to(*seconds),
        }
    }

    fn retry_deferred(&mut self) {
        if let Some(command) = self.deferred.take() {
            // A load for a track that is no longer active is stale
            if let Deferred::Load(id) = &command {
                if self.current_track().is_none_or(|track| &track.id != id) {
                    return;
                }
            }
            debug!(?command, "Retrying deferred player command");
            self.command(command);
        }
    }
}

impl<P: PlaybackBackend, D: ControllerDelegate> Drop for PlayerController<P, D> {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc, time::Duration};

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Load(String),
        Play,
        Pause,
        Seek(f64),
        Destroy,
    }

    /// Records calls, and fails them all while `failing` is set.
    #[derive(Default)]
    struct FakePlayer {
        calls: Rc<RefCell<Vec<Call>>>,
        failing: Rc<RefCell<bool>>,
        state: EmbedState,
        time: f64,
        duration: f64,
    }

    impl FakePlayer {
        fn record(&mut self, call: Call) -> Result<(), AdapterError> {
            if *self.failing.borrow() {
                return Err(AdapterError::NotReady);
            }
            self.calls.borrow_mut().push(call);
            Ok(())
        }
    }

    impl PlaybackBackend for FakePlayer {
        fn load_track(&mut self, id: &str) -> Result<(), AdapterError> {
            self.record(Call::Load(id.to_string()))
        }

        fn play(&mut self) -> Result<(), AdapterError> {
            self.record(Call::Play)
        }

        fn pause(&mut self) -> Result<(), AdapterError> {
            self.record(Call::Pause)
        }

        fn seek_to(&mut self, seconds: f64) -> Result<(), AdapterError> {
            self.record(Call::Seek(seconds))
        }

        fn current_time(&self) -> Result<f64, AdapterError> {
            if *self.failing.borrow() {
                return Err(AdapterError::NotReady);
            }
            Ok(self.time)
        }

        fn duration(&self) -> Result<f64, AdapterError> {
            if *self.failing.borrow() {
                return Err(AdapterError::NotReady);
            }
            Ok(self.duration)
        }

        fn state(&self) -> Result<EmbedState, AdapterError> {
            if *self.failing.borrow() {
                return Err(AdapterError::NotReady);
            }
            Ok(self.state)
        }

        fn observe(&mut self, notification: &PlayerNotification) {
            match *notification {
                PlayerNotification::StateChanged(state) => self.state = state,
                PlayerNotification::TimeChanged(t) => self.time = t,
                PlayerNotification::DurationChanged(d) => self.duration = d,
                PlayerNotification::Ready => {}
            }
        }

        fn destroy(&mut self) {
            self.calls.borrow_mut().push(Call::Destroy);
        }
    }

    #[derive(Default)]
    struct FakeDelegate {
        changes: Rc<RefCell<Vec<usize>>>,
    }

    impl ControllerDelegate for FakeDelegate {
        fn on_active_track_changed(&self, index: usize, _track: &Track) {
            self.changes.borrow_mut().push(index);
        }
    }

    struct Harness {
        controller: PlayerController<FakePlayer, FakeDelegate>,
        calls: Rc<RefCell<Vec<Call>>>,
        failing: Rc<RefCell<bool>>,
        changes: Rc<RefCell<Vec<usize>>>,
    }

    impl Harness {
        fn new(track_ids: &[&str], initial_slide: usize) -> Self {
            let player = FakePlayer::default();
            let calls = Rc::clone(&player.calls);
            let failing = Rc::clone(&player.failing);
            let delegate = FakeDelegate::default();
            let changes = Rc::clone(&delegate.changes);

            let mut controller =
                PlayerController::new(player, delegate, GestureConfig::default(), initial_slide);
            controller.set_tracks(tracks(track_ids));
            calls.borrow_mut().clear();
            changes.borrow_mut().clear();

            Self {
                controller,
                calls,
                failing,
                changes,
            }
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.borrow().clone()
        }

        fn index(&self) -> usize {
            self.controller.state().active_index
        }

        fn set_failing(&self, failing: bool) {
            *self.failing.borrow_mut() = failing;
        }
    }

    fn tracks(ids: &[&str]) -> Vec<Track> {
        ids.iter().map(|id| Track::new(id, id, "", "")).collect()
    }

    fn palette() -> Palette {
        Palette::from_regions([[10, 20, 30]; 5])
    }

    #[test]
    fn transition_table() {
        use PlaybackStatus::*;

        let all = [Idle, Loading, Playing, Paused, Ended];
        for from in all {
            assert_eq!(from.transition(Signal::Load), Loading);
            assert_eq!(from.transition(Signal::Reset), Idle);
            assert_eq!(from.transition(Signal::Reported(EmbedState::Playing)), Playing);
            assert_eq!(from.transition(Signal::Reported(EmbedState::Paused)), Paused);
            assert_eq!(from.transition(Signal::Reported(EmbedState::Ended)), Ended);
        }
        assert_eq!(Idle.transition(Signal::Reported(EmbedState::Unstarted)), Idle);
        assert_eq!(Playing.transition(Signal::Reported(EmbedState::Unstarted)), Loading);

        assert!(Loading.is_playing());
        assert!(Playing.is_playing());
        assert!(!Paused.is_playing());
        assert!(!Ended.is_playing());
        assert!(!Idle.is_playing());
    }

    #[test]
    fn mount_loads_initial_slide_and_plays() {
        let player = FakePlayer::default();
        let calls = Rc::clone(&player.calls);
        let mut controller =
            PlayerController::new(player, FakeDelegate::default(), GestureConfig::default(), 3);

        controller.set_tracks(tracks(&["a", "b", "c", "d", "e"]));

        assert_eq!(controller.state().active_index, 3);
        assert_eq!(controller.carousel().centered(), 3);
        assert!(controller.state().is_playing());
        assert_eq!(*calls.borrow(), vec![Call::Load("d".to_string()), Call::Play]);
    }

    #[test]
    fn initial_slide_is_clamped_to_short_lists() {
        let h = Harness::new(&["a", "b"], 3);
        assert_eq!(h.index(), 1);
    }

    #[test]
    fn next_three_times_wraps_around() {
        let mut h = Harness::new(&["A", "B", "C"], 0);

        let mut seen = vec![];
        for _ in 0..3 {
            h.controller.next();
            seen.push(h.index());
        }

        assert_eq!(seen, vec![1, 2, 0]);
        assert_eq!(h.controller.carousel().centered(), 0);
        assert_eq!(
            h.calls(),
            vec![
                Call::Load("B".to_string()),
                Call::Load("C".to_string()),
                Call::Load("A".to_string())
            ]
        );
    }

    #[test]
    fn next_and_prev_are_inverse() {
        for start in 0..4 {
            let mut h = Harness::new(&["a", "b", "c", "d"], start);

            h.controller.next();
            h.controller.prev();
            assert_eq!(h.index(), start);

            h.controller.prev();
            h.controller.next();
            assert_eq!(h.index(), start);
        }
    }

    #[test]
    fn prev_at_zero_wraps_to_last() {
        let mut h = Harness::new(&["a", "b", "c"], 0);

        h.controller.prev();

        assert_eq!(h.index(), 2);
        assert!(h.controller.state().is_playing());
    }

    #[test]
    fn empty_list_makes_everything_a_no_op() {
        let mut h = Harness::new(&[], 3);

        h.controller.next();
        h.controller.prev();
        h.controller.play_pause();
        h.controller.seek_to(10.0);
        h.controller.go_to(0);
        h.controller.on_wheel(500.0, Instant::now());
        h.controller.on_slide_changed(0);

        assert!(h.calls().is_empty());
        assert_eq!(h.index(), 0);
        assert!(!h.controller.state().is_playing());
        assert!(h.controller.current_track().is_none());
    }

    #[test]
    fn ended_advances_and_plays() {
        let mut h = Harness::new(&["a", "b", "c"], 2);
        h.controller
            .handle_notification(PlayerNotification::StateChanged(EmbedState::Paused));
        assert!(!h.controller.state().is_playing());

        h.controller
            .handle_notification(PlayerNotification::StateChanged(EmbedState::Ended));

        assert_eq!(h.index(), 0);
        assert!(h.controller.state().is_playing());
        assert_eq!(h.calls(), vec![Call::Load("a".to_string())]);
    }

    #[test]
    fn notifications_resynchronise_playing_flag() {
        let mut h = Harness::new(&["a", "b"], 0);

        h.controller
            .handle_notification(PlayerNotification::StateChanged(EmbedState::Paused));
        assert_eq!(h.controller.state().status, PlaybackStatus::Paused);

        h.controller
            .handle_notification(PlayerNotification::StateChanged(EmbedState::Playing));
        assert_eq!(h.controller.state().status, PlaybackStatus::Playing);
    }

    #[test]
    fn play_pause_follows_reported_state() {
        let mut h = Harness::new(&["a", "b"], 0);

        h.controller
            .handle_notification(PlayerNotification::StateChanged(EmbedState::Playing));
        h.controller.play_pause();

        h.controller
            .handle_notification(PlayerNotification::StateChanged(EmbedState::Paused));
        h.controller.play_pause();

        assert_eq!(h.calls(), vec![Call::Pause, Call::Play]);
    }

    #[test]
    fn play_pause_ignores_drifted_local_flag() {
        let mut h = Harness::new(&["a", "b"], 0);
        // Locally still "loading", but the player never started
        assert!(h.controller.state().is_playing());

        h.controller.play_pause();

        assert_eq!(h.calls(), vec![Call::Play]);
    }

    #[test]
    fn slide_change_drives_playback() {
        let mut h = Harness::new(&["a", "b", "c", "d"], 0);

        h.controller.drag_carousel(2);
        assert_eq!(h.index(), 2);

        h.controller.click_slide(3);
        assert_eq!(h.index(), 3);

        h.controller.click_slide(3);

        assert_eq!(h.calls(), vec![Call::Load("c".to_string()), Call::Load("d".to_string())]);
        assert_eq!(*h.changes.borrow(), vec![2, 3]);
    }

    #[test]
    fn seek_does_not_change_index() {
        let mut h = Harness::new(&["a", "b"], 1);
        h.controller
            .handle_notification(PlayerNotification::DurationChanged(100.0));
        h.controller.poll_progress();

        h.controller.seek_to(250.0);
        h.controller.scrub(0.25);

        assert_eq!(h.index(), 1);
        assert_eq!(h.calls(), vec![Call::Seek(100.0), Call::Seek(25.0)]);
        assert_eq!(h.controller.state().progress_seconds, 25.0);
    }

    #[test]
    fn progress_is_clamped_to_duration() {
        let mut h = Harness::new(&["a"], 0);

        h.controller
            .handle_notification(PlayerNotification::DurationChanged(60.0));
        h.controller
            .handle_notification(PlayerNotification::TimeChanged(75.0));
        h.controller.poll_progress();

        let state = h.controller.state();
        assert_eq!(state.progress_seconds, 60.0);
        assert_eq!(state.ratio(), Some(1.0));
    }

    #[test]
    fn wheel_below_threshold_does_not_navigate() {
        let mut h = Harness::new(&["a", "b", "c"], 0);
        let now = Instant::now();

        h.controller.on_wheel(20.0, now);
        h.controller.on_wheel(20.0, now);

        assert_eq!(h.index(), 0);
        assert!(h.calls().is_empty());
    }

    #[test]
    fn wheel_commits_exactly_one_step() {
        let mut h = Harness::new(&["a", "b", "c"], 0);
        let now = Instant::now();

        h.controller.on_wheel(30.0, now);
        h.controller.on_wheel(30.0, now);
        h.controller.on_wheel(300.0, now + Duration::from_millis(10));

        assert_eq!(h.index(), 1);
        assert_eq!(h.calls(), vec![Call::Load("b".to_string())]);

        h.controller.on_wheel(-60.0, now + Duration::from_millis(500));
        assert_eq!(h.index(), 0);
    }

    #[test]
    fn wheel_ignored_for_single_track() {
        let mut h = Harness::new(&["a"], 0);

        h.controller.on_wheel(500.0, Instant::now());

        assert!(h.calls().is_empty());
    }

    #[test]
    fn failures_are_deferred_and_retried() {
        let mut h = Harness::new(&["a", "b", "c"], 0);
        h.set_failing(true);

        h.controller.next();
        assert_eq!(h.index(), 1);
        assert_eq!(h.controller.deferred(), Some(&Deferred::Load("b".to_string())));
        assert!(h.calls().is_empty());

        h.set_failing(false);
        h.controller.handle_notification(PlayerNotification::Ready);

        assert_eq!(h.calls(), vec![Call::Load("b".to_string())]);
        assert_eq!(h.controller.deferred(), None);
    }

    #[test]
    fn play_pause_failure_is_deferred() {
        let mut h = Harness::new(&["a"], 0);
        h.set_failing(true);

        h.controller.play_pause();
        assert_eq!(h.controller.deferred(), Some(&Deferred::Pause));

        h.set_failing(false);
        h.controller
            .handle_notification(PlayerNotification::StateChanged(EmbedState::Playing));
        assert_eq!(h.calls(), vec![Call::Pause]);
    }

    #[test]
    fn stale_palette_is_ignored() {
        let mut h = Harness::new(&["a", "b"], 0);

        assert!(h.controller.apply_palette(0, palette()));
        assert_eq!(h.controller.palette(), Some(&palette()));

        h.controller.next();
        assert!(h.controller.palette().is_none());
        assert!(!h.controller.apply_palette(0, palette()));
        assert!(h.controller.apply_palette(1, palette()));
    }

    #[test]
    fn revalidation_keeps_current_track() {
        let mut h = Harness::new(&["a", "b", "c"], 1);

        h.controller.set_tracks(tracks(&["z", "a", "b", "c"]));

        assert_eq!(h.index(), 2);
        assert_eq!(h.controller.current_track().map(|t| t.id.as_str()), Some("b"));
        assert!(h.calls().is_empty());
    }

    #[test]
    fn revalidation_replacing_current_track_clears_palette() {
        let mut h = Harness::new(&["a", "b", "c"], 2);
        assert!(h.controller.apply_palette(2, palette()));

        h.controller.set_tracks(tracks(&["x", "y", "z"]));

        assert_eq!(h.controller.current_track().map(|t| t.id.as_str()), Some("z"));
        assert!(h.controller.palette().is_none());
    }

    #[test]
    fn revalidation_keeps_palette_of_surviving_track() {
        let mut h = Harness::new(&["a", "b", "c"], 1);
        assert!(h.controller.apply_palette(1, palette()));

        h.controller.set_tracks(tracks(&["z", "a", "b", "c"]));

        assert_eq!(h.controller.palette(), Some(&palette()));
    }

    #[test]
    fn deferred_load_follows_track_moved_by_revalidation() {
        let mut h = Harness::new(&["a", "b", "c"], 0);
        h.set_failing(true);
        h.controller.next();

        h.controller.set_tracks(tracks(&["z", "a", "b", "c"]));
        assert_eq!(h.index(), 2);

        h.set_failing(false);
        h.controller.handle_notification(PlayerNotification::Ready);

        assert_eq!(h.calls(), vec![Call::Load("b".to_string())]);
        assert_eq!(h.controller.deferred(), None);
    }

    #[test]
    fn deferred_load_for_inactive_track_is_dropped() {
        let mut h = Harness::new(&["a", "b", "c"], 0);
        h.set_failing(true);
        h.controller.next();
        h.set_failing(false);
        h.controller.go_to(2);
        h.calls.borrow_mut().clear();

        h.controller.handle_notification(PlayerNotification::Ready);

        assert!(h.calls().is_empty());
        assert_eq!(h.controller.deferred(), None);
    }

    #[test]
    fn revalidation_without_current_track_reloads() {
        let mut h = Harness::new(&["a", "b", "c"], 2);

        h.controller.set_tracks(tracks(&["x", "y"]));

        assert_eq!(h.index(), 1);
        assert_eq!(h.calls(), vec![Call::Load("y".to_string()), Call::Play]);
    }

    #[test]
    fn dispose_releases_player_once() {
        let mut h = Harness::new(&["a", "b"], 0);
        h.controller
            .attach_poller(FramePoller::spawn(Duration::from_millis(1), || true));

        h.controller.dispose();
        h.controller.dispose();
        h.controller.next();

        assert_eq!(h.calls(), vec![Call::Destroy]);
        assert!(!h.controller.state().is_playing());
    }
}
