// SPDX-FileCopyrightText: Copyright (c) 2017-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A pure [Rust](https://www.rust-lang.org)
//! [Modbus](https://en.wikipedia.org/wiki/Modbus) client library with
//! synchronous, blocking I/O.
//!
//! Modbus is based on a [master/slave](https://en.wikipedia.org/wiki/Master/slave_(technology))
//! model. To avoid confusion with the underlying transport terminology the
//! master is called *client* and the slave is called *server* in this
//! library.
//!
//! Each call on a [`client::Context`] performs exactly one half-duplex
//! request/response transaction on the attached byte stream. Frames are bare
//! protocol data units without CRC or MBAP header; the stream must be
//! reliable and ordered.
//!
//! ```no_run
//! use std::net::TcpStream;
//!
//! use sync_modbus::{client::stream, prelude::*};
//!
//! fn main() -> anyhow::Result<()> {
//!     let socket = TcpStream::connect("192.168.0.222:6502")?;
//!     let mut ctx = stream::attach(socket);
//!
//!     let buff = ctx.read_input_registers(0x1000, 7)??;
//!     println!("Response is '{buff:?}'");
//!
//!     Ok(())
//! }
//! ```

pub mod client;

pub mod endian;

pub mod prelude;

mod codec;

mod error;

mod frame;

pub use crate::{
    error::Error,
    frame::{
        Address, Coil, ExceptionCode, FunctionCode, Quantity, Request, Response, Word,
    },
};

/// The outcome of a _Modbus_ transaction.
///
/// The outer error means no protocol-level answer was obtained (validation,
/// transport or resource failure); the inner error is the exception the
/// server responded with. A genuine exception code of `0` and an empty but
/// valid payload both remain representable and distinct from "no answer".
pub type Result<T> = std::result::Result<std::result::Result<T, ExceptionCode>, Error>;
