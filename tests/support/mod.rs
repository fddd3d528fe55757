// SPDX-FileCopyrightText: Copyright (c) 2017-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::{
    cell::RefCell,
    collections::VecDeque,
    io::{self, Read, Write},
    rc::Rc,
};

/// A scripted server side for one or more transactions.
///
/// Every expected transaction pairs the exact request PDU the client must
/// transmit with the response bytes the server returns. Reads are served
/// from the response of the transaction whose request was verified last.
#[derive(Debug, Default)]
pub struct ScriptedStream {
    transactions: VecDeque<(Vec<u8>, Vec<u8>)>,
    pending_response: Vec<u8>,
}

impl ScriptedStream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues one expected request and the wire bytes of its response.
    pub fn expect(mut self, request: &[u8], response: &[u8]) -> Self {
        self.transactions
            .push_back((request.to_vec(), response.to_vec()));
        self
    }

    pub fn is_exhausted(&self) -> bool {
        self.transactions.is_empty() && self.pending_response.is_empty()
    }

    /// Splits the stream into a handle to attach a client to and a handle
    /// for inspecting it afterwards.
    pub fn into_shared(self) -> (SharedStream, Rc<RefCell<ScriptedStream>>) {
        let inner = Rc::new(RefCell::new(self));
        (SharedStream(Rc::clone(&inner)), inner)
    }
}

#[derive(Debug)]
pub struct SharedStream(Rc<RefCell<ScriptedStream>>);

impl Read for SharedStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.0.borrow_mut().read(buf)
    }
}

impl Write for SharedStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.borrow_mut().flush()
    }
}

impl Read for ScriptedStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.pending_response.len().min(buf.len());
        buf[..n].copy_from_slice(&self.pending_response[..n]);
        self.pending_response.drain(..n);
        Ok(n)
    }
}

impl Write for ScriptedStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let (expected, response) = self
            .transactions
            .pop_front()
            .expect("unexpected request on the wire");
        assert_eq!(buf, expected, "request PDU");
        self.pending_response = response;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
