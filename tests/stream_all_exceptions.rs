// SPDX-FileCopyrightText: Copyright (c) 2017-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Exception responses for every supported function.

mod support;

use support::ScriptedStream;
use sync_modbus::{client::stream, prelude::*};

#[test]
fn all_exceptions() -> anyhow::Result<()> {
    let (transport, stream) = ScriptedStream::new()
        .expect(&[0x01, 0x00, 0x00, 0x00, 0x02], &[0x81, 0x05])
        .expect(&[0x02, 0x00, 0x00, 0x00, 0x02], &[0x82, 0x0A])
        .expect(&[0x05, 0x00, 0x00, 0xFF, 0x00], &[0x85, 0x0B])
        .expect(&[0x0F, 0x00, 0x00, 0x00, 0x01, 0x01, 0x01], &[0x8F, 0x02])
        .expect(&[0x04, 0x00, 0x00, 0x00, 0x02], &[0x84, 0x03])
        .expect(&[0x03, 0x00, 0x00, 0x00, 0x02], &[0x83, 0x01])
        .expect(&[0x06, 0x00, 0x00, 0x00, 0x2A], &[0x86, 0x08])
        .expect(
            &[0x10, 0x00, 0x00, 0x00, 0x01, 0x02, 0x00, 0x2A],
            &[0x90, 0x06],
        )
        .expect(
            &[0x17, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x02, 0x00, 0x2A],
            &[0x97, 0x04],
        )
        .into_shared();
    let mut ctx = stream::attach(transport);

    let response = ctx.read_coils(0x00, 2)?;
    assert!(matches!(response, Err(ExceptionCode::Acknowledge)));

    let response = ctx.read_discrete_inputs(0x00, 2)?;
    assert!(matches!(
        response,
        Err(ExceptionCode::GatewayPathUnavailable)
    ));

    let response = ctx.write_single_coil(0x00, true)?;
    assert!(matches!(response, Err(ExceptionCode::GatewayTargetDevice)));

    let response = ctx.write_multiple_coils(0x00, &[true])?;
    assert!(matches!(response, Err(ExceptionCode::IllegalDataAddress)));

    let response = ctx.read_input_registers(0x00, 2)?;
    assert!(matches!(response, Err(ExceptionCode::IllegalDataValue)));

    let response = ctx.read_holding_registers(0x00, 2)?;
    assert!(matches!(response, Err(ExceptionCode::IllegalFunction)));

    let response = ctx.write_single_register(0x00, 42)?;
    assert!(matches!(response, Err(ExceptionCode::MemoryParityError)));

    let response = ctx.write_multiple_registers(0x00, &[42])?;
    assert!(matches!(response, Err(ExceptionCode::ServerDeviceBusy)));

    let response = ctx.read_write_multiple_registers(0x00, 1, 0x00, &[42])?;
    assert!(matches!(response, Err(ExceptionCode::ServerDeviceFailure)));

    assert!(stream.borrow().is_exhausted());
    Ok(())
}

#[test]
fn custom_exception_code_is_preserved() -> anyhow::Result<()> {
    let (transport, _) = ScriptedStream::new()
        .expect(&[0x01, 0x00, 0x00, 0x00, 0x01], &[0x81, 0x00])
        .into_shared();
    let mut ctx = stream::attach(transport);

    // A code of zero is not a predefined exception but must survive decoding.
    let response = ctx.read_coils(0x00, 1)?;
    assert!(matches!(response, Err(ExceptionCode::Custom(0))));
    Ok(())
}
