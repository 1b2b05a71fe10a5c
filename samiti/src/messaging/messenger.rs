// SPDX-License-Identifier: MIT OR Apache-2.0

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use futures_util::StreamExt;
use samiti_auth::{AuthorizationDenied, Capability};
use samiti_core::{Collection, IdentityId, Message, MessageId, Timestamp};
use samiti_store::{ChangeFeed, DataStore, FeedError, Query, SessionStorage, Subscription};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use crate::error::{MessagingError, ValidationError};
use crate::messaging::channel::{Channel, ChannelStatus};
use crate::messaging::log::MessageLog;
use crate::session::Session;

#[derive(Debug, Default)]
struct ChannelState {
    /// Open channel and the identity which opened it.
    open: Option<(Channel, IdentityId)>,
    status: ChannelStatus,
    log: MessageLog,
}

impl ChannelState {
    fn mark_stale(&mut self) {
        if let ChannelStatus::Live { stale } = &mut self.status {
            *stale = true;
        }
    }
}

/// Handle on the task merging change-feed notifications into the log.
#[derive(Debug)]
struct Pump {
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

/// Shows one messaging channel at a time and keeps its log current.
pub struct Messenger<S, P> {
    store: S,
    session: Session<P>,
    state: Arc<RwLock<ChannelState>>,
    pump: Option<Pump>,
}

impl<S, P> Messenger<S, P>
where
    S: DataStore + ChangeFeed,
    P: SessionStorage,
{
    pub fn new(store: S, session: Session<P>) -> Self {
        Self {
            store,
            session,
            state: Arc::default(),
            pump: None,
        }
    }

    /// Open a channel for the current identity, closing the previously open one first.
    ///
    /// The previous channel is closed even when the current identity may not open the new one.
    /// The change feed is subscribed before the history is read, an insert landing in between
    /// shows up through both and is merged once. If the subscription can not be established the
    /// channel still opens, as stale.
    pub async fn open(&mut self, channel: Channel) -> Result<(), MessagingError<S::Error>> {
        self.close().await;

        let viewer = self.session.authorize(Capability::UseMessaging)?;

        {
            let mut state = self.write_state();
            state.open = Some((channel, viewer.id));
            state.status = ChannelStatus::Subscribing;
            state.log.clear();
        }
        debug!(%channel, viewer = %viewer.id, "open channel");

        let subscription = match self.store.subscribe(Collection::Messages).await {
            Ok(subscription) => Some(subscription),
            Err(err) => {
                warn!(%channel, "subscribing to messages failed: {err}");
                None
            }
        };

        let query = Query::all()
            .filter(move |message: &Message| channel.admits(viewer.id, message))
            .order_by(Message::order_key);
        let history = match self.store.read_all(&query).await {
            Ok(history) => history,
            Err(err) => {
                if let Some(subscription) = subscription {
                    let _ = subscription.unsubscribe().await;
                }
                *self.write_state() = ChannelState::default();
                return Err(MessagingError::Store(err));
            }
        };

        {
            let mut state = self.write_state();
            state.log.extend(history);
            state.status = ChannelStatus::Live {
                stale: subscription.is_none(),
            };
            trace!(%channel, messages = state.log.len(), "channel live");
        }

        if let Some(subscription) = subscription {
            let (shutdown, shutdown_rx) = oneshot::channel();
            let handle = tokio::spawn(pump(
                subscription,
                channel,
                viewer.id,
                self.session.clone(),
                self.state.clone(),
                shutdown_rx,
            ));
            self.pump = Some(Pump { shutdown, handle });
        }

        Ok(())
    }

    /// Close the open channel.
    ///
    /// Returns after the subscription was cancelled; nothing it delivered afterwards reaches a
    /// log.
    pub async fn close(&mut self) {
        if let Some(pump) = self.pump.take() {
            let _ = pump.shutdown.send(());
            if let Err(err) = pump.handle.await {
                warn!("message pump ended abnormally: {err}");
            }
        }

        let mut state = self.write_state();
        if let Some((channel, _)) = state.open.take() {
            debug!(%channel, "close channel");
        }
        *state = ChannelState::default();
    }

    /// Send a message on the open channel.
    ///
    /// Returns the key the store assigned. The message is not added to the log here, it appears
    /// when the change feed announces it.
    pub async fn send(&self, text: &str) -> Result<MessageId, MessagingError<S::Error>> {
        let sender = self.session.authorize(Capability::UseMessaging)?;

        let (channel, viewer) = self.read_state().open.ok_or(MessagingError::NoChannel)?;
        if sender.id != viewer {
            return Err(AuthorizationDenied {
                capability: Capability::UseMessaging,
            }
            .into());
        }

        if text.trim().is_empty() {
            return Err(ValidationError::EmptyMessage.into());
        }

        let message = Message::new(sender.id, channel.recipient(), text, Timestamp::now());
        let message = self
            .store
            .upsert(message)
            .await
            .map_err(MessagingError::Store)?;

        debug!(%channel, id = %message.id, "sent message");
        Ok(message.id)
    }

    pub fn channel(&self) -> Option<Channel> {
        self.read_state().open.map(|(channel, _)| channel)
    }

    pub fn status(&self) -> ChannelStatus {
        self.read_state().status
    }

    /// Messages of the open channel in display order.
    ///
    /// Empty once the identity which opened the channel no longer holds the session.
    pub fn messages(&self) -> Vec<Message> {
        let state = self.read_state();
        match state.open {
            Some((_, viewer)) if holds_session(&self.session, viewer) => {
                state.log.iter().cloned().collect()
            }
            _ => Vec::new(),
        }
    }

    fn read_state(&self) -> RwLockReadGuard<'_, ChannelState> {
        self.state
            .read()
            .expect("acquire shared read access on channel state")
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, ChannelState> {
        self.state
            .write()
            .expect("acquire exclusive write access on channel state")
    }
}

/// Merge notifications into the channel log until shut down or the feed ends.
async fn pump<T, P>(
    mut subscription: T,
    channel: Channel,
    viewer: IdentityId,
    session: Session<P>,
    state: Arc<RwLock<ChannelState>>,
    mut shutdown: oneshot::Receiver<()>,
) where
    T: Subscription,
    P: SessionStorage,
{
    loop {
        tokio::select! {
            biased;

            // Also fires when the messenger is dropped.
            _ = &mut shutdown => break,

            item = subscription.next() => {
                match item {
                    Some(Ok(insert)) => {
                        if !holds_session(&session, viewer) {
                            debug!(%channel, %viewer, "session changed, dropping channel");
                            *state
                                .write()
                                .expect("acquire exclusive write access on channel state") =
                                ChannelState::default();
                            break;
                        }

                        let message = match insert.decode::<Message>() {
                            Ok(message) => message,
                            Err(err) => {
                                warn!(%channel, "ignoring undecodable notification: {err}");
                                continue;
                            }
                        };

                        if !channel.admits(viewer, &message) {
                            continue;
                        }

                        let id = message.id;
                        let merged = state
                            .write()
                            .expect("acquire exclusive write access on channel state")
                            .log
                            .insert(message);
                        trace!(%channel, %id, merged, "notification");
                    }
                    Some(Err(err)) => {
                        // Missed notifications can not be recovered without reopening.
                        warn!(%channel, "change feed error: {err}");
                        mark_stale(&state);
                        if !matches!(err, FeedError::Lagged(_)) {
                            break;
                        }
                    }
                    None => {
                        warn!(%channel, "change feed ended");
                        mark_stale(&state);
                        break;
                    }
                }
            }
        }
    }

    if let Err(err) = subscription.unsubscribe().await {
        warn!(%channel, "unsubscribing failed: {err}");
    }
}

fn mark_stale(state: &RwLock<ChannelState>) {
    state
        .write()
        .expect("acquire exclusive write access on channel state")
        .mark_stale();
}

/// Returns `true` while `viewer` is the identity holding the session.
fn holds_session<P>(session: &Session<P>, viewer: IdentityId) -> bool {
    session
        .current()
        .is_some_and(|identity| identity.id == viewer)
}
