// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use esplink::{decode, encode_command, encode_telemetry, Packet};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Any accepted datagram must re-encode to the same length, and to the
    // same bytes once booleans are canonical
    if let Ok(packet) = decode(data) {
        let frame = packet.frame();
        assert_eq!(frame.len(), data.len());
        assert_eq!(frame.as_bytes()[0], data[0]);

        match packet {
            Packet::Telemetry(t) => {
                let again = encode_telemetry(&t);
                assert_eq!(&again[1..17], &data[1..17]);
                assert_eq!(again[19], data[19]);
            }
            Packet::Command(c) => {
                let again = encode_command(&c);
                assert_eq!(&again[..6], &data[..6]);
            }
        }
    }
});
