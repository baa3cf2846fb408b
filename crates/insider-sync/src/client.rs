//! The room sync client.
//!
//! One [`RoomSyncClient`] mirrors one room for one player. It owns a single
//! link: events come in through [`apply`](RoomSyncClient::apply) or
//! [`recv`](RoomSyncClient::recv) and are folded into a [`RoomView`];
//! commands go out through a [`Publisher`] that only exists while the broker
//! session is up.

use std::collections::HashMap;

use insider_protocol::{
    Codec, GamePrivateInfo, GameSnapshot, JsonCodec, Player, PlayerUuid, RoomCode, Routes, Topic,
};
use insider_transport::{EventStream, Link, LinkEvent, SubscriptionId, Transport};

use crate::link::{LinkGuard, LinkState};
use crate::{ConnectionStatus, LastUpdate, Publisher, RoomView, StateChange, SyncConfig, SyncError};

/// Keeps a local view of one room in sync and publishes the player's
/// commands.
///
/// Not `Clone`: the link is owned exclusively. Dropping the client runs
/// [`shutdown`](Self::shutdown).
pub struct RoomSyncClient<L: Link, C: Codec = JsonCodec> {
    routes: Routes,
    player: PlayerUuid,
    config: SyncConfig,
    codec: C,
    link: LinkState<L>,
    events: Option<EventStream>,
    subscriptions: HashMap<SubscriptionId, Topic>,
    view: RoomView,
}

impl<L: Link> RoomSyncClient<L> {
    /// Opens a link, subscribes to the room's topics, and returns a client
    /// with an empty view.
    ///
    /// The client starts disconnected; it becomes connected once the
    /// transport reports [`LinkEvent::Connected`].
    ///
    /// # Errors
    /// Returns `SyncError::Protocol` for an invalid room code or player
    /// uuid, and `SyncError::Transport` if the link cannot be opened or a
    /// topic cannot be subscribed. A link opened before the failure is
    /// closed before this returns.
    pub async fn open<T>(
        transport: &mut T,
        room_code: impl Into<String>,
        player_uuid: impl Into<String>,
        config: SyncConfig,
    ) -> Result<Self, SyncError>
    where
        T: Transport<Link = L>,
    {
        Self::open_with_codec(transport, room_code, player_uuid, config, JsonCodec).await
    }
}

impl<L: Link, C: Codec> RoomSyncClient<L, C> {
    /// Like [`open`](RoomSyncClient::open), with a custom body codec.
    ///
    /// # Errors
    /// See [`open`](RoomSyncClient::open).
    pub async fn open_with_codec<T>(
        transport: &mut T,
        room_code: impl Into<String>,
        player_uuid: impl Into<String>,
        config: SyncConfig,
        codec: C,
    ) -> Result<Self, SyncError>
    where
        T: Transport<Link = L>,
    {
        let room = RoomCode::parse(room_code)?;
        let player = PlayerUuid::parse(player_uuid)?;
        let routes = Routes::new(room, config.topics.clone());

        let (link, events) = transport.open().await?;
        let mut guard = LinkGuard::new(link);

        let mut subscriptions = HashMap::with_capacity(Topic::ALL.len());
        for topic in Topic::ALL {
            let destination = routes.topic(topic);
            let id = guard.subscribe(&destination)?;
            tracing::debug!(room = %routes.room(), %topic, %destination, subscription = %id, "subscribed");
            subscriptions.insert(id, topic);
        }

        let link = guard.disarm()?;
        tracing::info!(
            room = %routes.room(),
            player = %player,
            link = %link.id(),
            "room sync opened"
        );

        Ok(Self {
            routes,
            player,
            config,
            codec,
            link: LinkState::Pending(link),
            events: Some(events),
            subscriptions,
            view: RoomView::new(),
        })
    }

    /// Folds one transport event into the client.
    ///
    /// Returns what changed, or `None` if the event was ignored: a repeated
    /// lifecycle event, a message for a subscription this client does not
    /// hold, a payload that failed to decode, or anything after shutdown.
    pub fn apply(&mut self, event: LinkEvent) -> Option<StateChange> {
        match event {
            LinkEvent::Connected => {
                if !self.link.connect() {
                    return None;
                }
                tracing::info!(room = %self.routes.room(), "connected");
                Some(StateChange::Connection(true))
            }
            LinkEvent::Disconnected { reason } => {
                if !self.link.disconnect() {
                    return None;
                }
                tracing::info!(
                    room = %self.routes.room(),
                    reason = reason.as_deref().unwrap_or("unknown"),
                    "disconnected"
                );
                Some(StateChange::Connection(false))
            }
            LinkEvent::Message { subscription, body } => {
                let Some(&topic) = self.subscriptions.get(&subscription) else {
                    tracing::debug!(
                        room = %self.routes.room(),
                        %subscription,
                        "message for unknown subscription ignored"
                    );
                    return None;
                };
                match self.view.fold(&self.codec, topic, &body) {
                    Ok(change) => Some(change),
                    Err(e) => {
                        tracing::warn!(
                            room = %self.routes.room(),
                            %topic,
                            error = %e,
                            "dropped malformed payload"
                        );
                        None
                    }
                }
            }
        }
    }

    /// Waits for the next event that changes something and applies it.
    ///
    /// Returns `None` once the link's event stream has ended or the client
    /// has been shut down.
    pub async fn recv(&mut self) -> Option<StateChange> {
        loop {
            let event = self.events.as_mut()?.recv().await?;
            if let Some(change) = self.apply(event) {
                return Some(change);
            }
        }
    }

    /// Unsubscribes every topic and releases the link.
    ///
    /// Idempotent. Failures are logged and otherwise ignored. Afterwards
    /// every action is a no-op and no event mutates the view.
    pub fn shutdown(&mut self) {
        let Some(mut link) = self.link.release() else {
            return;
        };

        for (id, topic) in self.subscriptions.drain() {
            if let Err(e) = link.unsubscribe(id) {
                tracing::debug!(
                    room = %self.routes.room(),
                    %topic,
                    subscription = %id,
                    error = %e,
                    "unsubscribe failed"
                );
            }
        }
        if let Err(e) = link.close() {
            tracing::warn!(room = %self.routes.room(), link = %link.id(), error = %e, "close failed");
        }
        self.events = None;

        tracing::info!(room = %self.routes.room(), link = %link.id(), "room sync released");
    }

    /// Returns a publisher if the broker session is up.
    pub fn publisher(&self) -> Option<Publisher<'_, L, C>> {
        self.link.live().map(|link| {
            Publisher::new(
                link,
                &self.routes,
                &self.player,
                &self.codec,
                self.config.refresh_on_action,
            )
        })
    }

    // -----------------------------------------------------------------------
    // Guarded actions
    // -----------------------------------------------------------------------

    /// Flips the player's ready flag. No-op unless connected.
    pub fn toggle_ready(&self) {
        self.guarded("toggle_ready", |p| p.toggle_ready())
    }

    /// Asks the server to start the round. No-op unless connected.
    ///
    /// The client does not check whether the player is the host.
    pub fn start_game(&self) {
        self.guarded("start_game", |p| p.start_game())
    }

    /// Reports the player's card as revealed, then (by default) pulls a
    /// fresh snapshot. No-op unless connected.
    pub fn handle_card_opened(&self) {
        self.guarded("handle_card_opened", |p| p.open_card())
    }

    pub fn request_snapshot(&self) {
        self.guarded("request_snapshot", |p| p.request_snapshot())
    }

    pub fn join(&self, player_name: Option<&str>) {
        self.guarded("join", |p| p.join(player_name))
    }

    pub fn leave_room(&self) {
        self.guarded("leave_room", |p| p.leave_room())
    }

    pub fn ping_presence(&self) {
        self.guarded("ping_presence", |p| p.ping_presence())
    }

    pub fn set_active(&self, active: bool) {
        self.guarded("set_active", |p| p.set_active(active))
    }

    /// Ends the question phase early (MASTER only, enforced by the server).
    pub fn end_round(&self) {
        self.guarded("end_round", |p| p.end_round())
    }

    fn guarded<F>(&self, action: &'static str, f: F)
    where
        F: FnOnce(&Publisher<'_, L, C>),
    {
        match self.publisher() {
            Some(publisher) => f(&publisher),
            None => tracing::debug!(
                room = %self.routes.room(),
                action,
                status = %self.status(),
                "not connected, action skipped"
            ),
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn room_code(&self) -> &RoomCode {
        self.routes.room()
    }

    pub fn player_uuid(&self) -> &PlayerUuid {
        &self.player
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn status(&self) -> ConnectionStatus {
        self.link.status()
    }

    pub fn is_connected(&self) -> bool {
        self.status().is_connected()
    }

    /// Returns `true` while the client still holds its link.
    pub fn holds_link(&self) -> bool {
        self.link.held().is_some()
    }

    pub fn view(&self) -> &RoomView {
        &self.view
    }

    pub fn players(&self) -> &[Player] {
        self.view.players()
    }

    pub fn active_game(&self) -> Option<&GameSnapshot> {
        self.view.active_game()
    }

    pub fn private_info(&self) -> Option<&GamePrivateInfo> {
        self.view.private_info()
    }

    pub fn last_update(&self) -> Option<LastUpdate> {
        self.view.last_update()
    }
}

impl<L: Link, C: Codec> Drop for RoomSyncClient<L, C> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
