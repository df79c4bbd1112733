// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use esplink::transport::NullTransport;
use esplink::{FreshnessPolicy, LinkConfig, Node, UavRole, UgvRole};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // First byte picks the policy, the rest is split into datagrams on 0xff
    let Some((&mode, rest)) = data.split_first() else {
        return;
    };
    let freshness = if mode & 1 == 0 {
        FreshnessPolicy::LastWriterWins
    } else {
        FreshnessPolicy::RejectOlder
    };
    let config = LinkConfig::new().with_freshness(freshness);

    let mut uav = Node::new(UavRole::new(), NullTransport::<u8>::new(), 2, config);
    let mut ugv = Node::new(UgvRole::new(), NullTransport::<u8>::new(), 1, config);

    for datagram in rest.split(|&b| b == 0xff) {
        let before = *uav.link().peer();
        if uav.receive(&2, datagram).is_err() {
            assert_eq!(*uav.link().peer(), before);
        }
        let _ = ugv.receive(&1, datagram);
        uav.transmit(0);
        ugv.transmit(0);
    }

    let stats = uav.stats();
    assert_eq!(
        stats.rx_accepted + stats.rx_rejected(),
        rest.split(|&b| b == 0xff).count() as u32
    );
});
