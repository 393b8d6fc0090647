use crate::transport::{LinkId, PeerChannel, PeerLink};
use dashmap::DashMap;
use playground_core::{HandshakeId, PeerId};
use std::future::Future;
use std::sync::Arc;

/// Who is connected. Established links are keyed by the remote `PeerId`;
/// offers still waiting for an answer are parked under their `HandshakeId`.
///
/// Safe to share between the controller and the transport event loop.
#[derive(Default)]
pub struct PeerRegistry {
    links: DashMap<PeerId, Arc<dyn PeerChannel>>,
    pending: DashMap<HandshakeId, Arc<PeerLink>>,
}

impl PeerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the link previously registered under `peer_id`, if any.
    pub fn register(
        &self,
        peer_id: PeerId,
        link: Arc<dyn PeerChannel>,
    ) -> Option<Arc<dyn PeerChannel>> {
        self.links.insert(peer_id, link)
    }

    pub fn unregister(&self, peer_id: &PeerId) -> Option<Arc<dyn PeerChannel>> {
        self.links.remove(peer_id).map(|(_, link)| link)
    }

    pub fn get(&self, peer_id: &PeerId) -> Option<Arc<dyn PeerChannel>> {
        self.links.get(peer_id).map(|entry| Arc::clone(entry.value()))
    }

    pub fn contains(&self, peer_id: &PeerId) -> bool {
        self.links.contains_key(peer_id)
    }

    pub fn size(&self) -> usize {
        self.links.len()
    }

    pub fn is_active(&self) -> bool {
        !self.links.is_empty()
    }

    pub fn peer_ids(&self) -> Vec<PeerId> {
        self.links.iter().map(|entry| entry.key().clone()).collect()
    }

    pub fn peer_for_link(&self, link_id: LinkId) -> Option<PeerId> {
        self.links
            .iter()
            .find(|entry| entry.value().link_id() == link_id)
            .map(|entry| entry.key().clone())
    }

    /// Copies the current entries so no map guard is held while sending.
    pub fn snapshot(&self) -> Vec<(PeerId, Arc<dyn PeerChannel>)> {
        self.links
            .iter()
            .map(|entry| (entry.key().clone(), Arc::clone(entry.value())))
            .collect()
    }

    /// Visits a snapshot of the registry in sequence.
    pub async fn for_each<F, Fut>(&self, mut visit: F)
    where
        F: FnMut(PeerId, Arc<dyn PeerChannel>) -> Fut,
        Fut: Future<Output = ()>,
    {
        for (peer_id, link) in self.snapshot() {
            visit(peer_id, link).await;
        }
    }

    /// Removes and returns every established link.
    pub fn drain(&self) -> Vec<(PeerId, Arc<dyn PeerChannel>)> {
        let drained = self.snapshot();
        for (peer_id, _) in &drained {
            self.links.remove(peer_id);
        }
        drained
    }

    pub fn stash_pending(&self, ticket: HandshakeId, link: Arc<PeerLink>) {
        self.pending.insert(ticket, link);
    }

    pub fn take_pending(&self, ticket: &HandshakeId) -> Option<Arc<PeerLink>> {
        self.pending.remove(ticket).map(|(_, link)| link)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn drain_pending(&self) -> Vec<Arc<PeerLink>> {
        let tickets: Vec<HandshakeId> = self.pending.iter().map(|entry| *entry.key()).collect();
        tickets
            .iter()
            .filter_map(|ticket| self.take_pending(ticket))
            .collect()
    }
}
