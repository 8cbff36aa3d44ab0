// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 Wirebench Contributors

//! Command bytes of the reference byte-stream protocol.

pub const CMD_NOP: u8 = 1;
pub const CMD_ADD: u8 = 2;
pub const CMD_MULT_TREE: u8 = 3;
pub const CMD_TO_HEX: u8 = 4;

/// Chunk size for streaming the `toHex` payload through the server.
pub const HEX_CHUNK_SIZE: usize = 8 * 1024;
