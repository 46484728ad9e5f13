// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Seam between the session core and the drawing engine.
//!
//! The bridge owns the engine and at most one change subscription. Change
//! notifications are tagged with the handle of the subscription that
//! produced them and queued on a channel; the controller drains the queue
//! and decides whether each event is still current.

use crate::engine::{DrawingEngine, ListenerId, SceneUpdate};
use crate::error::SessionError;
use crate::models::scene::{Element, SceneSnapshot};
use std::fmt;
use std::sync::mpsc::{channel, Receiver, Sender};

/// Identity of one subscription. Never reused within a bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle(u64);

impl fmt::Display for SubscriptionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A scene change, tagged with the subscription that delivered it.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeEvent {
    pub handle: SubscriptionHandle,
    pub snapshot: SceneSnapshot,
}

#[derive(Debug)]
struct Subscription {
    handle: SubscriptionHandle,
    listener: ListenerId,
}

pub struct SceneBridge<E: DrawingEngine> {
    engine: E,
    live: Option<Subscription>,
    next_handle: u64,
    sender: Sender<ChangeEvent>,
    receiver: Receiver<ChangeEvent>,
}

impl<E: DrawingEngine> SceneBridge<E> {
    pub fn new(engine: E) -> Self {
        let (sender, receiver) = channel();
        Self {
            engine,
            live: None,
            next_handle: 0,
            sender,
            receiver,
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// Handle of the live subscription, if any.
    pub fn live_handle(&self) -> Option<SubscriptionHandle> {
        self.live.as_ref().map(|s| s.handle)
    }

    /// Start forwarding engine changes to the event queue.
    ///
    /// Only one subscription may be live; a second call before
    /// [`dispose`](Self::dispose) fails with `SubscriptionActive`.
    pub fn subscribe(&mut self) -> Result<SubscriptionHandle, SessionError> {
        if let Some(live) = &self.live {
            return Err(SessionError::SubscriptionActive(live.handle));
        }

        self.next_handle += 1;
        let handle = SubscriptionHandle(self.next_handle);
        let sender = self.sender.clone();
        let listener = self.engine.on_change(Box::new(move |scene: &SceneSnapshot| {
            let _ = sender.send(ChangeEvent {
                handle,
                snapshot: scene.clone(),
            });
        }));

        self.live = Some(Subscription { handle, listener });
        log::debug!("Subscribed to scene changes ({})", handle);
        Ok(handle)
    }

    /// Stop delivery from the live subscription. Returns its handle.
    pub fn dispose(&mut self) -> Option<SubscriptionHandle> {
        let subscription = self.live.take()?;
        self.engine.remove_listener(subscription.listener);
        log::debug!("Disposed subscription {}", subscription.handle);
        Some(subscription.handle)
    }

    /// Replace the engine's displayed scene.
    pub fn push_scene(&mut self, snapshot: &SceneSnapshot) {
        self.engine.update_scene(SceneUpdate::replace(snapshot.clone()));
    }

    /// Current element list from the engine.
    pub fn scene_elements(&self) -> Vec<Element> {
        self.engine.scene_elements().to_vec()
    }

    /// Next queued change event, without blocking.
    pub fn next_event(&self) -> Option<ChangeEvent> {
        self.receiver.try_recv().ok()
    }
}

impl<E: DrawingEngine> Drop for SceneBridge<E> {
    fn drop(&mut self) {
        self.dispose();
    }
}
