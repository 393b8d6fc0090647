use playground_core::{ObjectState, PeerId, PlayerState};
use playground_session::SessionController;
use std::sync::{Arc, Mutex};

/// Everything a session reported to the application.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    StateUpdate(PlayerState),
    ObjectState(ObjectState),
    PlayerJoined(PlayerState),
    PlayerLeft(PeerId),
    HostStopped(Option<String>),
    PeerConnected(PeerId),
    PeerDisconnected(PeerId),
}

/// Registers a handler for every session callback and records what fires.
#[derive(Clone, Default)]
pub struct CallbackRecorder {
    events: Arc<Mutex<Vec<SessionEvent>>>,
}

impl CallbackRecorder {
    pub fn attach(session: &SessionController) -> Self {
        let recorder = Self::default();

        let events = Arc::clone(&recorder.events);
        session.set_on_state_update(move |s| push(&events, SessionEvent::StateUpdate(s.clone())));
        let events = Arc::clone(&recorder.events);
        session.set_on_object_state(move |s| push(&events, SessionEvent::ObjectState(s.clone())));
        let events = Arc::clone(&recorder.events);
        session.set_on_player_joined(move |s| push(&events, SessionEvent::PlayerJoined(s.clone())));
        let events = Arc::clone(&recorder.events);
        session.set_on_player_left(move |id| push(&events, SessionEvent::PlayerLeft(id.clone())));
        let events = Arc::clone(&recorder.events);
        session.set_on_host_stopped(move |msg| {
            push(&events, SessionEvent::HostStopped(msg.map(str::to_owned)))
        });
        let events = Arc::clone(&recorder.events);
        session.set_on_peer_connected(move |id| push(&events, SessionEvent::PeerConnected(id.clone())));
        let events = Arc::clone(&recorder.events);
        session.set_on_peer_disconnected(move |id| {
            push(&events, SessionEvent::PeerDisconnected(id.clone()))
        });

        recorder
    }

    pub fn events(&self) -> Vec<SessionEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn state_updates(&self) -> Vec<PlayerState> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                SessionEvent::StateUpdate(s) => Some(s),
                _ => None,
            })
            .collect()
    }

    /// Polls until `pred` matches a recorded event or the timeout expires.
    pub async fn wait_for<F>(&self, timeout_ms: u64, pred: F) -> bool
    where
        F: Fn(&SessionEvent) -> bool,
    {
        let start = std::time::Instant::now();
        let timeout = std::time::Duration::from_millis(timeout_ms);

        loop {
            if self.events.lock().unwrap().iter().any(&pred) {
                return true;
            }
            if start.elapsed() > timeout {
                return false;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
    }
}

fn push(events: &Mutex<Vec<SessionEvent>>, event: SessionEvent) {
    events.lock().unwrap().push(event);
}
