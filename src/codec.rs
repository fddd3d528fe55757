// SPDX-FileCopyrightText: Copyright (c) 2017-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Encoding of request PDUs and decoding of response payloads.
//!
//! A PDU is a single function code byte followed by the function-specific
//! data. Multi-byte fields are big-endian on the wire and are normalized
//! with [`crate::endian`] in both directions.

use bytes::{BufMut, BytesMut};

use crate::{
    endian::swap_host_wire_endian,
    error::Error,
    frame::{Coil, FunctionCode, Request, Response, Word},
};

type Result<T> = std::result::Result<T, Error>;

/// Assembles the request PDU for transmission.
///
/// The returned buffer is transaction-scoped: the caller transmits it once
/// and drops it.
pub(crate) fn encode_request(req: &Request) -> BytesMut {
    let mut data = BytesMut::with_capacity(request_pdu_len(req));
    data.put_u8(req.function_code().value());

    use Request::*;
    match req {
        ReadCoils(address, quantity)
        | ReadDiscreteInputs(address, quantity)
        | ReadInputRegisters(address, quantity)
        | ReadHoldingRegisters(address, quantity) => {
            put_u16(&mut data, *address);
            put_u16(&mut data, *quantity);
        }
        WriteSingleCoil(address, state) => {
            put_u16(&mut data, *address);
            put_u16(&mut data, bool_to_u16_coil(*state));
        }
        WriteSingleRegister(address, word) => {
            put_u16(&mut data, *address);
            put_u16(&mut data, *word);
        }
        WriteMultipleCoils(address, coils) => {
            put_u16(&mut data, *address);
            put_u16(&mut data, coils.len() as u16);
            let packed = pack_coils(coils);
            data.put_u8(packed.len() as u8);
            data.put_slice(&packed);
        }
        WriteMultipleRegisters(address, words) => {
            put_u16(&mut data, *address);
            put_u16(&mut data, words.len() as u16);
            data.put_u8((words.len() * 2) as u8);
            put_words(&mut data, words);
        }
        ReadWriteMultipleRegisters(read_address, quantity, write_address, words) => {
            put_u16(&mut data, *read_address);
            put_u16(&mut data, *quantity);
            put_u16(&mut data, *write_address);
            put_u16(&mut data, words.len() as u16);
            data.put_u8((words.len() * 2) as u8);
            put_words(&mut data, words);
        }
    }
    data
}

fn request_pdu_len(req: &Request) -> usize {
    use Request::*;
    match req {
        ReadCoils(_, _)
        | ReadDiscreteInputs(_, _)
        | ReadInputRegisters(_, _)
        | ReadHoldingRegisters(_, _)
        | WriteSingleCoil(_, _)
        | WriteSingleRegister(_, _) => 5,
        WriteMultipleCoils(_, coils) => 6 + packed_coils_len(coils.len()),
        WriteMultipleRegisters(_, words) => 6 + words.len() * 2,
        ReadWriteMultipleRegisters(_, _, _, words) => 10 + words.len() * 2,
    }
}

/// Number of bytes that follow the two-byte response header.
///
/// The read family announces its payload length in the second header byte.
/// The write family echoes address and value/quantity in a fixed five-byte
/// response, of which three bytes remain after the header.
pub(crate) const fn response_trailer_len(function: FunctionCode, header_byte: u8) -> usize {
    use FunctionCode::*;
    match function {
        ReadCoils | ReadDiscreteInputs | ReadInputRegisters | ReadHoldingRegisters
        | ReadWriteMultipleRegisters => header_byte as usize,
        WriteSingleCoil | WriteSingleRegister | WriteMultipleCoils | WriteMultipleRegisters => 3,
    }
}

/// Decodes a successful response from its header byte and trailer.
///
/// `header_byte` is the second byte of the response header, `trailer` the
/// [`response_trailer_len`] bytes read after it.
pub(crate) fn decode_response(
    function: FunctionCode,
    header_byte: u8,
    trailer: &[u8],
) -> Result<Response> {
    use FunctionCode::*;
    debug_assert_eq!(trailer.len(), response_trailer_len(function, header_byte));

    let rsp = match function {
        ReadCoils => Response::ReadCoils(unpack_coils(trailer)),
        ReadDiscreteInputs => Response::ReadDiscreteInputs(unpack_coils(trailer)),
        ReadInputRegisters => Response::ReadInputRegisters(get_words(header_byte, trailer)?),
        ReadHoldingRegisters => Response::ReadHoldingRegisters(get_words(header_byte, trailer)?),
        ReadWriteMultipleRegisters => {
            Response::ReadWriteMultipleRegisters(get_words(header_byte, trailer)?)
        }
        WriteSingleCoil | WriteSingleRegister | WriteMultipleCoils | WriteMultipleRegisters => {
            // Reassemble the echoed address whose high byte arrived in the
            // header.
            let address = get_u16(&[header_byte, trailer[0]]);
            let value = get_u16(&trailer[1..3]);
            match function {
                WriteSingleCoil => Response::WriteSingleCoil(address, u16_coil_to_bool(value)?),
                WriteSingleRegister => Response::WriteSingleRegister(address, value),
                WriteMultipleCoils => Response::WriteMultipleCoils(address, value),
                WriteMultipleRegisters => Response::WriteMultipleRegisters(address, value),
                _ => unreachable!(),
            }
        }
    };
    Ok(rsp)
}

fn put_u16(data: &mut BytesMut, value: u16) {
    let mut bytes = value.to_ne_bytes();
    swap_host_wire_endian(&mut bytes, 2);
    data.put_slice(&bytes);
}

fn get_u16(bytes: &[u8]) -> u16 {
    let mut field = [bytes[0], bytes[1]];
    swap_host_wire_endian(&mut field, 2);
    u16::from_ne_bytes(field)
}

fn put_words(data: &mut BytesMut, words: &[Word]) {
    let mut bytes = Vec::with_capacity(words.len() * 2);
    for word in words {
        bytes.extend_from_slice(&word.to_ne_bytes());
    }
    swap_host_wire_endian(&mut bytes, 2);
    data.put_slice(&bytes);
}

fn get_words(byte_count: u8, bytes: &[u8]) -> Result<Vec<Word>> {
    if byte_count % 2 != 0 {
        return Err(Error::ByteCount(byte_count));
    }
    let mut buf = bytes.to_vec();
    swap_host_wire_endian(&mut buf, 2);
    Ok(buf
        .chunks_exact(2)
        .map(|chunk| Word::from_ne_bytes([chunk[0], chunk[1]]))
        .collect())
}

fn bool_to_u16_coil(state: bool) -> u16 {
    if state {
        0xFF00
    } else {
        0x0000
    }
}

fn u16_coil_to_bool(coil: u16) -> Result<bool> {
    match coil {
        0xFF00 => Ok(true),
        0x0000 => Ok(false),
        _ => Err(Error::CoilValue(coil)),
    }
}

const fn packed_coils_len(bitcount: usize) -> usize {
    (bitcount + 7) / 8
}

/// Packs coils into bytes, LSB first within each byte, ascending address.
fn pack_coils(coils: &[Coil]) -> Vec<u8> {
    let mut packed = vec![0; packed_coils_len(coils.len())];
    for (i, coil) in coils.iter().enumerate() {
        let bit = u8::from(*coil);
        packed[i / 8] |= bit << (i % 8);
    }
    packed
}

/// Unpacks all bits of `bytes` into coils, LSB first within each byte.
///
/// The caller truncates to the quantity it requested; the trailing filler
/// bits are unspecified by the protocol.
fn unpack_coils(bytes: &[u8]) -> Vec<Coil> {
    let mut coils = Vec::with_capacity(bytes.len() * 8);
    for byte in bytes {
        for bit in 0..8 {
            coils.push((byte >> bit) & 0b1 > 0);
        }
    }
    coils
}
