use crate::session::session_controller::SessionShared;
use crate::session::Dispatch;
use crate::transport::TransportEvent;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Single consumer of every transport callback of a session.
pub(crate) struct SessionEventLoop {
    shared: Arc<SessionShared>,
    event_rx: mpsc::UnboundedReceiver<TransportEvent>,
}

impl SessionEventLoop {
    pub(crate) fn new(
        shared: Arc<SessionShared>,
        event_rx: mpsc::UnboundedReceiver<TransportEvent>,
    ) -> Self {
        Self { shared, event_rx }
    }

    pub(crate) async fn run(mut self) {
        info!("Session event loop started for {}", self.shared.local_id);

        while let Some(event) = self.event_rx.recv().await {
            self.handle_transport_event(event).await;
        }

        info!("Session event loop finished for {}", self.shared.local_id);
    }

    async fn handle_transport_event(&self, event: TransportEvent) {
        match event {
            TransportEvent::ChannelOpen(link_id) => {
                let Some(peer_id) = self.shared.registry.peer_for_link(link_id) else {
                    debug!("Open event for unregistered link {}", link_id);
                    return;
                };
                info!("Peer {} connected", peer_id);
                self.shared.dispatcher.callbacks().peer_connected(&peer_id);
            }

            TransportEvent::Message(link_id, data) => {
                let Some(peer_id) = self.shared.registry.peer_for_link(link_id) else {
                    debug!("Dropping frame from unregistered link {}", link_id);
                    return;
                };
                if self.shared.dispatcher.handle_frame(&peer_id, &data) == Dispatch::HostStopped {
                    self.shared.drop_peer(&peer_id).await;
                }
            }

            TransportEvent::Closed(link_id) => {
                let Some(peer_id) = self.shared.registry.peer_for_link(link_id) else {
                    return;
                };
                info!("Link to {} closed", peer_id);
                self.shared.drop_peer(&peer_id).await;
            }
        }
    }
}
