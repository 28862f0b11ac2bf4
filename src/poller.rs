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

//! Cancellable frame loop.
//!
//! The [`FramePoller`] is the application's animation clock: it drives
//! progress polling and the eased visual effects. It is the one resource that
//! needs deterministic teardown, so cancelling it joins the thread.

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread::{self, JoinHandle},
    time::Duration,
};

pub(crate) struct FramePoller {
    cancelled: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl FramePoller {
    /// Spawns a thread calling `tick` every `interval`.
    ///
    /// The loop ends when the poller is cancelled or `tick` returns `false`,
    /// typically because its receiver has gone away.
    pub(crate) fn spawn<F>(interval: Duration, mut tick: F) -> Self
    where
        F: FnMut() -> bool + Send + 'static,
    {
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);

        let handle = thread::spawn(move || {
            while !flag.load(Ordering::Acquire) {
                if !tick() {
                    break;
                }
                thread::sleep(interval);
            }
        });

        Self {
            cancelled,
            handle: Some(handle),
        }
    }

    pub(crate) fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stops the loop and waits for the thread to exit. Idempotent.
    pub(crate) fn cancel(&mut self) {
        self.cancelled.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for FramePoller {
    fn drop(&mut self) {
        self.cancel();
    }
}
