// SPDX-FileCopyrightText: Copyright (c) 2017-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Modbus client over a plain byte stream.
//!
//! Frames are bare PDUs without CRC or MBAP header; the channel must be a
//! reliable ordered byte stream such as an already-framed serial line or a
//! connected socket. The protocol is half-duplex: one request is followed by
//! exactly one response, and concurrent callers sharing a channel must
//! serialize transactions externally.

use std::{
    fmt::Debug,
    io::{self, Read, Write},
};

use log::{error, warn};

use crate::{
    client::{Client, Context},
    codec,
    frame::{ExceptionCode, Quantity, Request, Response},
    Error, Result,
};

/// Maximum number of coils or discrete inputs per read request.
const MAX_READ_BITS: Quantity = 0x07D0;
/// Maximum number of registers per read request.
const MAX_READ_WORDS: Quantity = 0x7D;
/// Maximum number of coils per multiple-write request.
const MAX_WRITE_BITS: Quantity = 0x07B0;
/// Maximum number of registers per multiple-write request.
const MAX_WRITE_WORDS: Quantity = 0x7B;
/// Maximum number of registers written by a combined read/write request.
const MAX_READ_WRITE_WORDS: Quantity = 0x79;

/// Attaches a new client context to the given transport.
///
/// The transport is owned by the context and outlives any number of
/// transactions.
pub fn attach<T>(transport: T) -> Context
where
    T: Read + Write + Debug + 'static,
{
    let client: Box<dyn Client> = Box::new(StreamClient::new(transport));
    Context::from(client)
}

/// Modbus stream client
#[derive(Debug)]
pub(crate) struct StreamClient<T> {
    transport: T,
}

impl<T> StreamClient<T>
where
    T: Read + Write,
{
    pub(crate) const fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Executes one request/response transaction.
    ///
    /// Every step either completes with the exact byte count it requires or
    /// terminates the transaction; short transfers are never retried or
    /// completed piecemeal.
    ///
    /// # Panics
    ///
    /// Panics if the response carries a function code that matches neither
    /// the request nor its exception flag. Such a header means the stream
    /// has lost framing and no subsequent read can be trusted.
    fn transact(&mut self, request: &Request) -> Result<Response> {
        if let Some((quantity, max)) = excess_quantity(request) {
            warn!(
                "quantity {quantity} exceeds the limit of {max} for function {}",
                request.function_code()
            );
            return Err(Error::InvalidQuantity {
                function: request.function_code(),
                quantity,
                max,
            });
        }

        let function = request.function_code();

        // Request frame, dropped after the transmission attempt on every
        // path.
        {
            let frame = codec::encode_request(request);
            let written = self.transport.write(&frame)?;
            if written != frame.len() {
                warn!(
                    "short write: transmitted {written} of {} request bytes",
                    frame.len()
                );
                return Err(short_transfer("incomplete request transmission"));
            }
        }

        let mut header = [0u8; 2];
        let received = self.transport.read(&mut header)?;
        if received != header.len() {
            warn!("short read: received {received} of 2 response header bytes");
            return Err(short_transfer("incomplete response header"));
        }

        if header[0] == function.exception_value() {
            return Ok(Err(ExceptionCode::new(header[1])));
        }
        if header[0] != function.value() {
            panic!(
                "desynchronized stream: response function code 0x{:02X} matches neither 0x{:02X} nor 0x{:02X}",
                header[0],
                function.value(),
                function.exception_value()
            );
        }

        let trailer_len = codec::response_trailer_len(function, header[1]);
        let mut trailer = Vec::new();
        if let Err(err) = trailer.try_reserve_exact(trailer_len) {
            error!("cannot allocate {trailer_len} bytes for the response payload");
            return Err(Error::Allocation(err));
        }
        trailer.resize(trailer_len, 0);

        let received = self.transport.read(&mut trailer)?;
        if received != trailer_len {
            warn!("short read: received {received} of {trailer_len} response payload bytes");
            return Err(short_transfer("incomplete response payload"));
        }

        codec::decode_response(function, header[1], &trailer).map(Ok)
    }
}

impl<T> Client for StreamClient<T>
where
    T: Read + Write + Debug,
{
    fn call(&mut self, request: Request) -> Result<Response> {
        self.transact(&request)
    }
}

fn short_transfer(message: &str) -> Error {
    Error::Transport(io::Error::new(io::ErrorKind::UnexpectedEof, message))
}

/// Checks a request's quantity against the protocol ceiling for its
/// function.
///
/// Returns the offending quantity and its limit, or `None` if the request
/// may go onto the wire.
fn excess_quantity(request: &Request) -> Option<(Quantity, Quantity)> {
    use Request::*;
    match request {
        ReadCoils(_, quantity) | ReadDiscreteInputs(_, quantity) => {
            (*quantity > MAX_READ_BITS).then_some((*quantity, MAX_READ_BITS))
        }
        ReadHoldingRegisters(_, quantity) | ReadInputRegisters(_, quantity) => {
            (*quantity > MAX_READ_WORDS).then_some((*quantity, MAX_READ_WORDS))
        }
        WriteMultipleCoils(_, coils) => (coils.len() > MAX_WRITE_BITS as usize)
            .then_some((coils.len() as Quantity, MAX_WRITE_BITS)),
        WriteMultipleRegisters(_, words) => (words.len() > MAX_WRITE_WORDS as usize)
            .then_some((words.len() as Quantity, MAX_WRITE_WORDS)),
        ReadWriteMultipleRegisters(_, quantity, _, words) => {
            if words.len() > MAX_READ_WRITE_WORDS as usize {
                return Some((words.len() as Quantity, MAX_READ_WRITE_WORDS));
            }
            (*quantity > MAX_READ_WORDS).then_some((*quantity, MAX_READ_WORDS))
        }
        WriteSingleCoil(_, _) | WriteSingleRegister(_, _) => None,
    }
}
