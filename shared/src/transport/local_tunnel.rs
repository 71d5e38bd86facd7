use std::collections::VecDeque;

use log::{trace, warn};

use crate::connection::connector::{DownlinkConnector, UplinkConnector};
use crate::protocol::packet_builder::PacketBuilder;
use crate::protocol::packet_parser::PacketParser;
use crate::protocol::{HEADER_SIZE, MAX_PAYLOAD_SIZE};

use super::error::TransportError;

struct DelayedPacket {
    remaining: f64,
    bytes: Vec<u8>,
}

/// An in-process link with configurable simulated latency and packet loss.
///
/// The tunnel owns the two receiving connectors and feeds them through one
/// [`PacketParser`], so code written against the connector interfaces runs
/// unchanged whether wired directly in-process or through this simulated
/// transport. The two directions are logically independent: order is
/// preserved within each, never across them.
pub struct LocalTunnel<S: UplinkConnector, C: DownlinkConnector> {
    server: S,
    client: C,
    parser: PacketParser,
    latency: f64,
    drop_rate: f32,
    to_server: VecDeque<DelayedPacket>,
    to_client: VecDeque<DelayedPacket>,
    packets_dropped: u64,
}

impl<S: UplinkConnector, C: DownlinkConnector> LocalTunnel<S, C> {
    pub fn new(server: S, client: C) -> Self {
        Self {
            server,
            client,
            parser: PacketParser::new(),
            latency: 0.0,
            drop_rate: 0.0,
            to_server: VecDeque::new(),
            to_client: VecDeque::new(),
            packets_dropped: 0,
        }
    }

    /// One-way delivery delay in seconds. Zero parses immediately on send.
    pub fn set_latency(&mut self, seconds: f64) {
        self.latency = seconds.max(0.0);
    }

    /// Independent per-packet loss probability, rolled before a packet
    /// enters the latency queue: a dropped packet never occupies a slot and
    /// never arrives.
    pub fn set_drop_rate(&mut self, rate: f32) {
        self.drop_rate = rate.clamp(0.0, 1.0);
    }

    pub fn server(&self) -> &S {
        &self.server
    }

    pub fn server_mut(&mut self) -> &mut S {
        &mut self.server
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn client_mut(&mut self) -> &mut C {
        &mut self.client
    }

    pub fn packets_dropped(&self) -> u64 {
        self.packets_dropped
    }

    pub fn packets_rejected(&self) -> u64 {
        self.parser.packets_rejected()
    }

    pub fn in_flight(&self) -> usize {
        self.to_server.len() + self.to_client.len()
    }

    /// Hands the connectors back, discarding anything still in flight
    pub fn into_parts(self) -> (S, C) {
        (self.server, self.client)
    }

    /// Submits one client-to-server packet
    pub fn send_to_server(&mut self, bytes: Vec<u8>) -> Result<(), TransportError> {
        let Some(packet) = self.admit(bytes)? else {
            return Ok(());
        };
        match packet {
            Admitted::Deliver(bytes) => {
                let _ = self.parser.parse_uplink(&bytes, &mut self.server);
            }
            Admitted::Delay(delayed) => self.to_server.push_back(delayed),
        }
        Ok(())
    }

    /// Submits one server-to-client packet
    pub fn send_to_client(&mut self, bytes: Vec<u8>) -> Result<(), TransportError> {
        let Some(packet) = self.admit(bytes)? else {
            return Ok(());
        };
        match packet {
            Admitted::Deliver(bytes) => {
                let _ = self.parser.parse_downlink(&bytes, &mut self.client);
            }
            Admitted::Delay(delayed) => self.to_client.push_back(delayed),
        }
        Ok(())
    }

    /// Sends everything a client-side builder has queued
    pub fn pump_uplink(&mut self, builder: &mut PacketBuilder) {
        for packet in builder.take_outgoing() {
            let _ = self.send_to_server(packet.bytes);
        }
    }

    /// Sends everything a server-side builder has queued
    pub fn pump_downlink(&mut self, builder: &mut PacketBuilder) {
        for packet in builder.take_outgoing() {
            let _ = self.send_to_client(packet.bytes);
        }
    }

    /// Advances simulated time: counts every queued packet down by `dt`
    /// seconds and releases the expired ones in FIFO order. Order within a
    /// direction is preserved even across latency changes - a packet never
    /// overtakes the one in front of it.
    pub fn step(&mut self, dt: f64) {
        for packet in self.to_server.iter_mut().chain(self.to_client.iter_mut()) {
            packet.remaining -= dt;
        }

        while self
            .to_server
            .front()
            .is_some_and(|packet| packet.remaining <= 0.0)
        {
            if let Some(packet) = self.to_server.pop_front() {
                let _ = self.parser.parse_uplink(&packet.bytes, &mut self.server);
            }
        }
        while self
            .to_client
            .front()
            .is_some_and(|packet| packet.remaining <= 0.0)
        {
            if let Some(packet) = self.to_client.pop_front() {
                let _ = self.parser.parse_downlink(&packet.bytes, &mut self.client);
            }
        }
    }

    /// Size check and loss roll, shared by both directions
    fn admit(&mut self, bytes: Vec<u8>) -> Result<Option<Admitted>, TransportError> {
        let payload_size = bytes.len().saturating_sub(HEADER_SIZE);
        if payload_size > MAX_PAYLOAD_SIZE {
            warn!(
                "rejecting oversize packet: {} byte payload exceeds {}",
                payload_size, MAX_PAYLOAD_SIZE
            );
            return Err(TransportError::PayloadTooLarge {
                size: payload_size,
                max: MAX_PAYLOAD_SIZE,
            });
        }

        if self.drop_rate >= 1.0 || (self.drop_rate > 0.0 && fastrand::f32() < self.drop_rate) {
            self.packets_dropped += 1;
            trace!("simulated loss dropped a packet ({} so far)", self.packets_dropped);
            return Ok(None);
        }

        if self.latency > 0.0 {
            Ok(Some(Admitted::Delay(DelayedPacket {
                remaining: self.latency,
                bytes,
            })))
        } else {
            Ok(Some(Admitted::Deliver(bytes)))
        }
    }
}

enum Admitted {
    Deliver(Vec<u8>),
    Delay(DelayedPacket),
}
