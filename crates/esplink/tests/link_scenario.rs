// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com
//
// End-to-end UAV <-> UGV scenarios over an in-memory radio.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use esplink::inbox::Inbox;
use esplink::wire::COMMAND_SIZE;
use esplink::{
    CommandCode, CommandPlan, Error, FreshnessPolicy, LinkConfig, Node, PacketKind, RejectReason,
    Transport, UavNode, UavRole, UgvNode, UgvRole,
};

const UAV_ADDR: u8 = 0xa1;
const UGV_ADDR: u8 = 0xb2;

type Air = Rc<RefCell<VecDeque<(u8, Vec<u8>)>>>;

/// One direction of the radio: pushes into the receiver's air queue
struct RadioTx {
    me: u8,
    air: Air,
    drop_next: usize,
}

impl RadioTx {
    fn new(me: u8, air: Air) -> Self {
        Self {
            me,
            air,
            drop_next: 0,
        }
    }
}

impl Transport for RadioTx {
    type Addr = u8;

    fn send(&mut self, _dest: &u8, data: &[u8]) -> esplink::Result<()> {
        if self.drop_next > 0 {
            self.drop_next -= 1;
            return Err(Error::TransportRejected(RejectReason::NoPeer));
        }
        self.air.borrow_mut().push_back((self.me, data.to_vec()));
        Ok(())
    }
}

fn pop(air: &Air) -> Option<(u8, Vec<u8>)> {
    air.borrow_mut().pop_front()
}

struct Link {
    uav: UavNode<RadioTx>,
    ugv: UgvNode<RadioTx>,
    to_uav: Air,
    to_ugv: Air,
}

impl Link {
    fn new(config: LinkConfig, plan: CommandPlan) -> Self {
        let to_uav: Air = Rc::default();
        let to_ugv: Air = Rc::default();
        let uav = Node::new(
            UavRole::new(),
            RadioTx::new(UAV_ADDR, to_ugv.clone()),
            UGV_ADDR,
            config,
        );
        let ugv = Node::new(
            UgvRole::with_plan(plan),
            RadioTx::new(UGV_ADDR, to_uav.clone()),
            UAV_ADDR,
            config,
        );
        Self {
            uav,
            ugv,
            to_uav,
            to_ugv,
        }
    }

    fn deliver_to_uav(&mut self) -> usize {
        let mut accepted = 0;
        while let Some((source, data)) = pop(&self.to_uav) {
            if self.uav.receive(&source, &data).is_ok() {
                accepted += 1;
            }
        }
        accepted
    }

    fn deliver_to_ugv(&mut self) -> usize {
        let mut accepted = 0;
        while let Some((source, data)) = pop(&self.to_ugv) {
            if self.ugv.receive(&source, &data).is_ok() {
                accepted += 1;
            }
        }
        accepted
    }
}

#[test]
fn command_ack_round_trip() {
    let mut link = Link::new(
        LinkConfig::default(),
        CommandPlan::Fixed {
            command: CommandCode::ARM,
            emergency_stop: false,
        },
    );

    // First seven commands are refused by the radio; the counter keeps advancing
    link.ugv.transport_mut().drop_next = 7;
    for _ in 0..7 {
        assert!(!link.ugv.transmit(0).is_accepted());
    }
    assert!(link.to_uav.borrow().is_empty());

    let report = link.ugv.transmit(2000);
    assert_eq!(report.sequence.value(), 7);
    assert_eq!(report.len, COMMAND_SIZE);
    assert_eq!(
        link.to_uav.borrow().front().map(|(_, d)| d.clone()),
        Some(vec![2, 7, 0, 0, 0, 1, 0])
    );

    assert_eq!(link.deliver_to_uav(), 1);
    assert!(!link.uav.emergency_stop());
    assert_eq!(link.uav.link().peer().last_command(), CommandCode::ARM);
    assert_eq!(link.uav.link().peer().last_command_sequence(), 7);

    let telemetry = link.uav.transmit(2100);
    assert_eq!(telemetry.packet.last_command_ack, CommandCode::ARM);

    assert_eq!(link.deliver_to_ugv(), 1);
    assert_eq!(link.ugv.link().peer().last_command_ack(), CommandCode::ARM);
    assert_eq!(link.ugv.link().peer().last_telemetry_sequence(), 0);
    assert_eq!(
        link.ugv.last_telemetry().map(|t| t.timestamp_ms),
        Some(2100)
    );
}

#[test]
fn emergency_stop_propagates_and_is_acknowledged() {
    let mut link = Link::new(
        LinkConfig::default(),
        CommandPlan::Fixed {
            command: CommandCode::EMERGENCY_STOP,
            emergency_stop: true,
        },
    );

    link.ugv.transmit(0);
    link.deliver_to_uav();
    assert!(link.uav.emergency_stop());

    link.uav.transmit(10);
    link.deliver_to_ugv();
    assert!(link.ugv.link().peer().peer_emergency_stop());
    assert_eq!(
        link.ugv.link().peer().last_command_ack(),
        CommandCode::EMERGENCY_STOP
    );

    // Explicit release clears the latch
    link.ugv.role_mut().set_plan(CommandPlan::Fixed {
        command: CommandCode::NONE,
        emergency_stop: false,
    });
    link.ugv.transmit(20);
    link.deliver_to_uav();
    assert!(!link.uav.emergency_stop());
}

#[test]
fn reordered_commands_last_writer_wins() {
    let mut link = Link::new(LinkConfig::default(), CommandPlan::Cycle);

    // Cycle plan requests e-stop on odd sequences; deliver 0..=5 in reverse
    for _ in 0..6 {
        link.ugv.transmit(0);
    }
    let mut queued: Vec<_> = link.to_uav.borrow_mut().drain(..).collect();
    queued.reverse();
    link.to_uav.borrow_mut().extend(queued);

    assert_eq!(link.deliver_to_uav(), 6);

    // Seq 0 arrived last
    assert_eq!(link.uav.link().peer().last_command_sequence(), 0);
    assert!(!link.uav.emergency_stop());
}

#[test]
fn reordered_commands_reject_older() {
    let config = LinkConfig::new().with_freshness(FreshnessPolicy::RejectOlder);
    let mut link = Link::new(config, CommandPlan::Cycle);

    for _ in 0..6 {
        link.ugv.transmit(0);
    }
    let mut queued: Vec<_> = link.to_uav.borrow_mut().drain(..).collect();
    queued.reverse();
    link.to_uav.borrow_mut().extend(queued);

    // Only seq 5 (first to arrive) is accepted
    assert_eq!(link.deliver_to_uav(), 1);
    assert_eq!(link.uav.link().peer().last_command_sequence(), 5);
    assert!(link.uav.emergency_stop());
    assert_eq!(link.uav.stats().rx_stale, 5);
}

#[test]
fn misrouted_packets_are_discarded() {
    let mut link = Link::new(LinkConfig::default(), CommandPlan::Cycle);

    // A UAV hearing its own telemetry echoed back
    let telemetry = link.uav.transmit(0);
    let (_, bytes) = link.to_ugv.borrow_mut().pop_front().unwrap();
    assert_eq!(
        link.uav.receive(&UAV_ADDR, &bytes),
        Err(Error::UnexpectedKind {
            expected: PacketKind::Command,
            actual: PacketKind::Telemetry,
        })
    );
    assert_eq!(telemetry.sequence.value(), 0);
    assert_eq!(link.uav.link().peer().accepted(), 0);
    assert_eq!(link.uav.stats().rx_unexpected_kind, 1);
}

#[test]
fn duplicated_datagrams_are_applied_twice() {
    let mut link = Link::new(LinkConfig::default(), CommandPlan::Cycle);

    link.uav.transmit(0);
    let datagram = link.to_ugv.borrow().front().cloned().unwrap();
    link.to_ugv.borrow_mut().push_back(datagram);

    assert_eq!(link.deliver_to_ugv(), 2);
    assert_eq!(link.ugv.link().peer().accepted(), 2);
}

#[test]
fn inbox_driven_receive() {
    let mut link = Link::new(LinkConfig::default(), CommandPlan::Cycle);
    let mut inbox: Inbox<u8, 16> = Inbox::new();
    let (mut producer, mut consumer) = inbox.split();

    for _ in 0..4 {
        link.ugv.transmit(0);
    }
    while let Some((source, data)) = pop(&link.to_uav) {
        assert!(producer.deliver(source, &data));
    }
    producer.deliver(UGV_ADDR, &[0x42]);

    assert_eq!(link.uav.drain(&mut consumer), 4);
    assert_eq!(link.uav.link().peer().last_command_sequence(), 3);
    assert_eq!(link.uav.link().peer().last_command(), CommandCode::LAND);
    assert!(link.uav.emergency_stop());
    assert_eq!(link.uav.stats().rx_unknown_type, 1);
}

#[test]
fn rejected_sends_still_advance_counter() {
    let mut link = Link::new(LinkConfig::default(), CommandPlan::Cycle);
    link.uav.transport_mut().drop_next = 3;

    for expected in 0..5u32 {
        let report = link.uav.transmit(0);
        assert_eq!(report.sequence.value(), expected);
        assert_eq!(report.is_accepted(), expected >= 3);
    }
    assert_eq!(link.uav.link().outgoing().current().value(), 5);
    assert_eq!(link.uav.stats().tx_attempts, 5);
    assert_eq!(link.uav.stats().tx_rejected, 3);
    assert_eq!(link.to_ugv.borrow().len(), 2);

    // Only the accepted sends reach the UGV, carrying their original sequences
    assert_eq!(link.deliver_to_ugv(), 2);
    assert_eq!(link.ugv.link().peer().last_telemetry_sequence(), 4);
}
