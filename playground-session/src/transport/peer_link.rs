use crate::transport::peer_channel::advance;
use crate::transport::{LinkId, LinkState, PeerChannel, TransportConfig, TransportEvent};
use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use bytes::Bytes;
use playground_core::{SdpKind, SessionDescription};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, mpsc, watch};
use tracing::{debug, info, warn};
use webrtc::api::APIBuilder;
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::MediaEngine;
use webrtc::data_channel::RTCDataChannel;
use webrtc::data_channel::data_channel_init::RTCDataChannelInit;
use webrtc::data_channel::data_channel_message::DataChannelMessage;
use webrtc::data_channel::data_channel_state::RTCDataChannelState;
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;

/// State reachable from transport callbacks. Never holds the peer connection itself.
struct LinkShared {
    id: LinkId,
    data_channel: Mutex<Option<Arc<RTCDataChannel>>>,
    state: watch::Sender<LinkState>,
    event_tx: mpsc::UnboundedSender<TransportEvent>,
}

impl LinkShared {
    fn mark_open(&self) {
        if advance(&self.state, LinkState::Open) {
            let _ = self.event_tx.send(TransportEvent::ChannelOpen(self.id));
        }
    }

    fn mark_closed(&self) {
        if advance(&self.state, LinkState::Closed) {
            let _ = self.event_tx.send(TransportEvent::Closed(self.id));
        }
    }
}

/// One WebRTC peer connection plus its game data channel.
pub struct PeerLink {
    shared: Arc<LinkShared>,
    peer_connection: Arc<RTCPeerConnection>,
    ice_gathering_timeout: Duration,
}

impl PeerLink {
    /// Builds a fresh peer connection. Every transport callback is reported on `event_tx`.
    pub async fn new(
        config: &TransportConfig,
        event_tx: mpsc::UnboundedSender<TransportEvent>,
    ) -> Result<Arc<Self>> {
        // 1. MediaEngine with the default codecs, even though only data channels are used
        let mut m = MediaEngine::default();
        m.register_default_codecs()?;
        // 2. Default interceptors (RTCP reports, NACK)
        let registry = register_default_interceptors(Registry::new(), &mut m)?;

        // 3. API object
        let api = APIBuilder::new()
            .with_media_engine(m)
            .with_interceptor_registry(registry)
            .build();

        // 4. ICE servers (STUN/TURN); empty means host candidates only
        let rtc_config = RTCConfiguration {
            ice_servers: config
                .ice_servers
                .iter()
                .map(|server| RTCIceServer {
                    urls: server.urls.clone(),
                    username: server.username.clone().unwrap_or_default(),
                    credential: server.credential.clone().unwrap_or_default(),
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        };

        // 5. PeerConnection
        let peer_connection = Arc::new(
            api.new_peer_connection(rtc_config)
                .await
                .context("Failed to create peer connection")?,
        );

        let (state, _) = watch::channel(LinkState::Connecting);
        let shared = Arc::new(LinkShared {
            id: LinkId::new(),
            data_channel: Mutex::new(None),
            state,
            event_tx,
        });

        // --- Callbacks ---
        // Each closure gets its own clone of `shared`, they must be 'static.

        // A. Connection state: a failed or dropped connection closes the link
        let state_shared = Arc::clone(&shared);
        peer_connection.on_peer_connection_state_change(Box::new(
            move |s: RTCPeerConnectionState| {
                let shared = Arc::clone(&state_shared);

                Box::pin(async move {
                    info!("Peer connection state for link {}: {:?}", shared.id, s);
                    match s {
                        RTCPeerConnectionState::Failed
                        | RTCPeerConnectionState::Disconnected
                        | RTCPeerConnectionState::Closed => shared.mark_closed(),
                        _ => {}
                    }
                })
            },
        ));

        // B. Answering side: the offerer created the channel
        let dc_shared = Arc::clone(&shared);
        peer_connection.on_data_channel(Box::new(move |dc: Arc<RTCDataChannel>| {
            let shared = Arc::clone(&dc_shared);

            Box::pin(async move {
                debug!("Remote opened data channel '{}' on link {}", dc.label(), shared.id);
                Self::attach_data_channel(&shared, dc).await;
            })
        }));

        Ok(Arc::new(Self {
            shared,
            peer_connection,
            ice_gathering_timeout: config.ice_gathering_timeout(),
        }))
    }

    async fn attach_data_channel(shared: &Arc<LinkShared>, dc: Arc<RTCDataChannel>) {
        // Open: the link becomes usable
        let open_shared = Arc::clone(shared);
        dc.on_open(Box::new(move || {
            let shared = Arc::clone(&open_shared);
            Box::pin(async move {
                info!("Data channel open on link {}", shared.id);
                shared.mark_open();
            })
        }));

        // Close from either side is terminal
        let close_shared = Arc::clone(shared);
        dc.on_close(Box::new(move || {
            let shared = Arc::clone(&close_shared);
            Box::pin(async move {
                info!("Data channel closed on link {}", shared.id);
                shared.mark_closed();
            })
        }));

        let error_id = shared.id;
        dc.on_error(Box::new(move |e: webrtc::Error| {
            Box::pin(async move {
                warn!("Data channel error on link {}: {}", error_id, e);
            })
        }));

        // Incoming frames go to the session event loop untouched
        let msg_shared = Arc::clone(shared);
        dc.on_message(Box::new(move |msg: DataChannelMessage| {
            let shared = Arc::clone(&msg_shared);
            Box::pin(async move {
                let bytes = Bytes::from(msg.data.to_vec());
                let _ = shared
                    .event_tx
                    .send(TransportEvent::Message(shared.id, bytes));
            })
        }));

        *shared.data_channel.lock().await = Some(dc);
    }

    /// Offering side: create the outbound game channel before the offer.
    pub async fn open_channel(&self, config: &TransportConfig) -> Result<()> {
        let init = RTCDataChannelInit {
            ordered: Some(config.channel.is_ordered()),
            max_retransmits: config.channel.max_retransmits(),
            ..Default::default()
        };

        let dc = self
            .peer_connection
            .create_data_channel(&config.channel_label, Some(init))
            .await
            .context("Failed to create data channel")?;

        Self::attach_data_channel(&self.shared, dc).await;
        Ok(())
    }

    pub async fn create_offer(&self) -> Result<SessionDescription> {
        let offer = self
            .peer_connection
            .create_offer(None)
            .await
            .context("Failed to create offer")?;
        self.commit_local(offer).await
    }

    pub async fn create_answer(&self) -> Result<SessionDescription> {
        let answer = self
            .peer_connection
            .create_answer(None)
            .await
            .context("Failed to create answer")?;
        self.commit_local(answer).await
    }

    /// Sets the local description and waits for ICE gathering, so the
    /// returned description already carries every candidate.
    async fn commit_local(&self, desc: RTCSessionDescription) -> Result<SessionDescription> {
        let mut gathering_complete = self.peer_connection.gathering_complete_promise().await;

        self.peer_connection
            .set_local_description(desc)
            .await
            .context("Failed to set local description")?;

        if tokio::time::timeout(self.ice_gathering_timeout, gathering_complete.recv())
            .await
            .is_err()
        {
            warn!(
                "ICE gathering on link {} did not finish within {:?}, using partial candidates",
                self.shared.id, self.ice_gathering_timeout
            );
        }

        let local = self
            .peer_connection
            .local_description()
            .await
            .context("Local description missing after commit")?;

        Ok(SessionDescription {
            kind: local.sdp_type.to_string().parse::<SdpKind>()?,
            sdp: local.sdp,
        })
    }

    pub async fn apply_remote(&self, desc: &SessionDescription) -> Result<()> {
        let rtc = match desc.kind {
            SdpKind::Offer => RTCSessionDescription::offer(desc.sdp.clone())?,
            SdpKind::Answer => RTCSessionDescription::answer(desc.sdp.clone())?,
        };

        self.peer_connection
            .set_remote_description(rtc)
            .await
            .context("Remote description rejected")?;
        Ok(())
    }
}

#[async_trait]
impl PeerChannel for PeerLink {
    fn link_id(&self) -> LinkId {
        self.shared.id
    }

    fn state_changes(&self) -> watch::Receiver<LinkState> {
        self.shared.state.subscribe()
    }

    async fn send_text(&self, frame: &str) -> Result<()> {
        let Some(dc) = self.shared.data_channel.lock().await.clone() else {
            bail!("no data channel on link {}", self.shared.id);
        };
        if dc.ready_state() != RTCDataChannelState::Open {
            bail!("data channel on link {} is {:?}", self.shared.id, dc.ready_state());
        }

        dc.send_text(frame.to_owned())
            .await
            .context("Failed to send frame")?;
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        advance(&self.shared.state, LinkState::Closed);

        if let Some(dc) = self.shared.data_channel.lock().await.take() {
            let _ = dc.close().await;
        }
        self.peer_connection.close().await?;
        Ok(())
    }
}
