//! The broadcast seam.
//!
//! The engine never talks to a transport directly. It hands finished
//! envelopes to a `PeerChannel`; the host delivers them to every other peer
//! and feeds inbound envelopes back through `TurnCoordinator::receive`.

use super::message::Envelope;

/// Ordered point-to-multipoint delivery to the other peers.
pub trait PeerChannel {
    /// Send to every other peer. Must not block.
    fn broadcast(&mut self, envelope: Envelope);
}

/// Collects outgoing envelopes. Hosts drain it after each call into the
/// coordinator; tests inspect it.
impl PeerChannel for Vec<Envelope> {
    fn broadcast(&mut self, envelope: Envelope) {
        self.push(envelope);
    }
}

impl<C: PeerChannel + ?Sized> PeerChannel for &mut C {
    fn broadcast(&mut self, envelope: Envelope) {
        (**self).broadcast(envelope);
    }
}

impl<C: PeerChannel + ?Sized> PeerChannel for Box<C> {
    fn broadcast(&mut self, envelope: Envelope) {
        (**self).broadcast(envelope);
    }
}

/// Discards everything. Solo and robot games have nobody to tell.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullChannel;

impl PeerChannel for NullChannel {
    fn broadcast(&mut self, _envelope: Envelope) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn send(channel: &mut impl PeerChannel) {
        channel.broadcast(Envelope::new('n', ""));
        channel.broadcast(Envelope::new('g', ""));
    }

    #[test]
    fn test_vec_channel_keeps_order() {
        let mut outbox: Vec<Envelope> = Vec::new();
        send(&mut outbox);
        let commands: Vec<char> = outbox.iter().map(|e| e.command).collect();
        assert_eq!(commands, vec!['n', 'g']);
    }

    #[test]
    fn test_boxed_channel() {
        let mut channel: Box<dyn PeerChannel> = Box::new(NullChannel);
        send(&mut channel);
    }
}
