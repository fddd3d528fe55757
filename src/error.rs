// SPDX-FileCopyrightText: Copyright (c) 2017-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types.

use std::{collections::TryReserveError, io};

use thiserror::Error;

use crate::frame::{FunctionCode, Quantity};

/// Failures that prevented a protocol-level answer from being obtained.
///
/// None of these originate from the server: a server that answers with a
/// _Modbus_ exception is reported through the inner `Result` of
/// [`Result`](crate::Result) instead, so callers can always tell "the device
/// said no" apart from "we could not talk to the device".
#[derive(Debug, Error)]
pub enum Error {
    /// The channel failed or transferred fewer bytes than required.
    #[error("transport: {0}")]
    Transport(#[from] io::Error),

    /// The requested quantity exceeds the protocol ceiling for the function.
    ///
    /// Detected before any bytes are sent.
    #[error("quantity {quantity} exceeds the limit of {max} for function {function}")]
    InvalidQuantity {
        function: FunctionCode,
        quantity: Quantity,
        max: Quantity,
    },

    /// The response payload buffer could not be reserved.
    #[error("response buffer allocation failed: {0}")]
    Allocation(#[from] TryReserveError),

    /// The response byte count does not fit the function's payload shape.
    #[error("invalid byte count: {0}")]
    ByteCount(u8),

    /// A coil value on the wire was neither `0xFF00` nor `0x0000`.
    #[error("invalid coil value: 0x{0:04X}")]
    CoilValue(u16),
}
