// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com
//
// Wire golden vectors: byte-exact reference encodings.
//
// These bytes are what a packed little-endian C struct produces on the ESP32
// firmware. Any change here breaks interop with deployed radios.

#![allow(clippy::float_cmp)]
#![allow(clippy::unreadable_literal)]

use esplink::wire::{COMMAND_SIZE, TELEMETRY_SIZE};
use esplink::{
    decode, encode_command, encode_telemetry, CommandCode, CommandPacket, DecodeError, Packet,
    TelemetryPacket,
};

const TELEMETRY_GOLDEN: [u8; TELEMETRY_SIZE] = [
    0x01, // type
    0x2a, 0x00, 0x00, 0x00, // sequence = 42
    0xe8, 0x03, 0x00, 0x00, // timestamp_ms = 1000
    0x00, 0x00, 0xc0, 0x3f, // velocity_x = 1.5
    0x00, 0x00, 0x20, 0xc0, // velocity_y = -2.5
    0x01, // marker_detected
    0x00, // emergency_stop
    0x03, // last_command_ack = land
];

const COMMAND_GOLDEN: [u8; COMMAND_SIZE] = [
    0x02, // type
    0x07, 0x00, 0x00, 0x00, // command_sequence = 7
    0x01, // command = arm
    0x00, // emergency_stop
];

fn telemetry_value() -> TelemetryPacket {
    TelemetryPacket {
        sequence: 42,
        timestamp_ms: 1000,
        velocity_x: 1.5,
        velocity_y: -2.5,
        marker_detected: true,
        emergency_stop: false,
        last_command_ack: CommandCode::LAND,
    }
}

fn command_value() -> CommandPacket {
    CommandPacket {
        command_sequence: 7,
        command: CommandCode::ARM,
        emergency_stop: false,
    }
}

#[test]
fn golden_telemetry_encode() {
    assert_eq!(encode_telemetry(&telemetry_value()), TELEMETRY_GOLDEN);
}

#[test]
fn golden_telemetry_decode() {
    assert_eq!(
        decode(&TELEMETRY_GOLDEN),
        Ok(Packet::Telemetry(telemetry_value()))
    );
}

#[test]
fn golden_command_encode() {
    assert_eq!(encode_command(&command_value()), COMMAND_GOLDEN);
}

#[test]
fn golden_command_decode() {
    assert_eq!(decode(&COMMAND_GOLDEN), Ok(Packet::Command(command_value())));
}

#[test]
fn golden_emergency_stop_command() {
    let packet = CommandPacket {
        command_sequence: 0xfffffffe,
        command: CommandCode::EMERGENCY_STOP,
        emergency_stop: true,
    };
    assert_eq!(
        encode_command(&packet),
        [0x02, 0xfe, 0xff, 0xff, 0xff, 0x04, 0x01]
    );
}

#[test]
fn golden_truncated_and_padded_rejected() {
    assert_eq!(
        decode(&TELEMETRY_GOLDEN[..19]),
        Err(DecodeError::SizeMismatch {
            expected: 20,
            actual: 19
        })
    );

    let mut padded = [0u8; COMMAND_SIZE + 1];
    padded[..COMMAND_SIZE].copy_from_slice(&COMMAND_GOLDEN);
    assert_eq!(
        decode(&padded),
        Err(DecodeError::SizeMismatch {
            expected: 7,
            actual: 8
        })
    );
}

#[test]
fn golden_spec_examples() {
    assert_eq!(decode(&[]), Err(DecodeError::Empty));
    assert_eq!(
        decode(&[99, 0, 0, 0, 0, 0, 0]),
        Err(DecodeError::UnknownType(99))
    );
    assert_eq!(
        decode(&[1, 0, 0, 0, 0, 0, 0]),
        Err(DecodeError::SizeMismatch {
            expected: 20,
            actual: 7
        })
    );
}
