use crate::error::SessionError;
use crate::registry::PeerRegistry;
use crate::transport::{PeerChannel, PeerLink, TransportConfig, TransportEvent};
use anyhow::Result;
use playground_core::{
    ConnectionDescription, HandshakeId, PeerId, RoomId, SdpKind, SessionDescription,
};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// Manual offer/answer handshake. Descriptions leave and enter as strings;
/// carrying them between the two parties is the application's job.
pub struct SignalingExchange {
    local_id: PeerId,
    config: TransportConfig,
    registry: Arc<PeerRegistry>,
    event_tx: mpsc::UnboundedSender<TransportEvent>,
}

impl SignalingExchange {
    pub fn new(
        local_id: PeerId,
        config: TransportConfig,
        registry: Arc<PeerRegistry>,
        event_tx: mpsc::UnboundedSender<TransportEvent>,
    ) -> Self {
        Self {
            local_id,
            config,
            registry,
            event_tx,
        }
    }

    /// Host side. The link waits in the registry until its answer is applied.
    pub async fn create_offer_description(
        &self,
        room: Option<RoomId>,
    ) -> Result<ConnectionDescription, SessionError> {
        let link = self.new_link().await?;

        let description = match self.prepare_offer(&link).await {
            Ok(description) => description,
            Err(e) => {
                error!("Failed to create offer: {:#}", e);
                let _ = link.close().await;
                return Err(SessionError::Transport(e));
            }
        };

        let ticket = HandshakeId::new();
        info!("Created offer {} on link {}", ticket, link.link_id());
        self.registry.stash_pending(ticket, link);

        Ok(ConnectionDescription {
            peer: self.local_id.clone(),
            ticket,
            room,
            description,
        })
    }

    /// Joiner side.
    pub async fn accept_offer_and_create_answer(
        &self,
        offer: &str,
    ) -> Result<ConnectionDescription, SessionError> {
        let offer = decode(offer, SdpKind::Offer)?;
        self.accept_offer(offer).await
    }

    pub(crate) async fn accept_offer(
        &self,
        offer: ConnectionDescription,
    ) -> Result<ConnectionDescription, SessionError> {
        let link = self.new_link().await?;

        let description = match self.prepare_answer(&link, &offer.description).await {
            Ok(description) => description,
            Err(e) => {
                error!("Failed to accept offer from {}: {:#}", offer.peer, e);
                let _ = link.close().await;
                return Err(SessionError::Transport(e));
            }
        };

        self.register(offer.peer.clone(), link).await;
        info!("Answered offer {} from {}", offer.ticket, offer.peer);

        Ok(ConnectionDescription {
            peer: self.local_id.clone(),
            ticket: offer.ticket,
            room: offer.room,
            description,
        })
    }

    /// Host completion. Consumes the pending offer whether or not the answer is accepted.
    pub async fn apply_answer_description(&self, answer: &str) -> Result<PeerId, SessionError> {
        let answer = decode(answer, SdpKind::Answer)?;

        let Some(link) = self.registry.take_pending(&answer.ticket) else {
            warn!("No pending offer for answer {} from {}", answer.ticket, answer.peer);
            return Err(SessionError::NoSuchPeer(answer.ticket));
        };

        if let Err(e) = link.apply_remote(&answer.description).await {
            error!("Failed to apply answer from {}: {:#}", answer.peer, e);
            let _ = link.close().await;
            return Err(SessionError::Transport(e));
        }

        self.register(answer.peer.clone(), link).await;
        info!("Applied answer from {}", answer.peer);
        Ok(answer.peer)
    }

    async fn new_link(&self) -> Result<Arc<PeerLink>, SessionError> {
        PeerLink::new(&self.config, self.event_tx.clone())
            .await
            .map_err(|e| {
                error!("Failed to create peer link: {:#}", e);
                SessionError::Transport(e)
            })
    }

    async fn prepare_offer(&self, link: &PeerLink) -> Result<SessionDescription> {
        link.open_channel(&self.config).await?;
        link.create_offer().await
    }

    async fn prepare_answer(
        &self,
        link: &PeerLink,
        offer: &SessionDescription,
    ) -> Result<SessionDescription> {
        link.apply_remote(offer).await?;
        link.create_answer().await
    }

    async fn register(&self, peer_id: PeerId, link: Arc<PeerLink>) {
        if let Some(previous) = self.registry.register(peer_id.clone(), link) {
            info!("Replacing existing link to {}", peer_id);
            let _ = previous.close().await;
        }
    }
}

pub(crate) fn decode(raw: &str, expected: SdpKind) -> Result<ConnectionDescription, SessionError> {
    let desc = ConnectionDescription::decode(raw).map_err(|e| {
        warn!("Rejected connection description: {}", e);
        SessionError::MalformedDescription(e)
    })?;

    if desc.kind() != expected {
        return Err(SessionError::UnexpectedDescription {
            expected,
            got: desc.kind(),
        });
    }
    Ok(desc)
}
