//! End-to-end AXI4-Lite handshake coverage against the register-file model.

use log as _;
use proptest::prelude::*;
use rstest::rstest;
use rtlsim_core::{
    read_transaction, reset_edge, write_transaction, AxiConfig, AxiInputs, AxiLiteRegisterFile,
    AxiOutputs, AxiResponse, DataWidth, NullTrace, ReadState, TraceEvent, TransactionLimits,
    WriteState,
};
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;

fn slave() -> AxiLiteRegisterFile {
    AxiLiteRegisterFile::new(AxiConfig::default()).expect("default config is valid")
}

fn write(axi: &mut AxiLiteRegisterFile, addr: u64, data: u64, strobe: u8) -> AxiResponse {
    write_transaction(axi, addr, data, strobe, TransactionLimits::default(), &mut NullTrace)
        .expect("write completes")
        .response
}

fn read(axi: &mut AxiLiteRegisterFile, addr: u64) -> (u64, AxiResponse) {
    let done =
        read_transaction(axi, addr, TransactionLimits::default(), &mut NullTrace).expect("read");
    (done.data, done.response)
}

#[test]
fn write_then_read_back_then_decode_error() {
    let mut axi = slave();

    assert_eq!(write(&mut axi, 0x4, 0xDEAD_BEEF, 0xF), AxiResponse::Okay);
    assert_eq!(axi.register(1), Some(0xDEAD_BEEF));

    assert_eq!(read(&mut axi, 0x4), (0xDEAD_BEEF, AxiResponse::Okay));

    let (_, response) = read(&mut axi, 0x40);
    assert_eq!(response, AxiResponse::DecErr);
    assert_eq!(write(&mut axi, 0x40, 0x1234, 0xF), AxiResponse::DecErr);
    assert_eq!(axi.registers().as_slice(), &[0, 0xDEAD_BEEF, 0, 0]);
}

#[test]
fn partial_strobe_updates_only_selected_lanes() {
    let mut axi = slave();
    write(&mut axi, 0x8, 0x1122_3344, 0xF);
    write(&mut axi, 0x8, 0xAABB_CCDD, 0b1010);
    assert_eq!(read(&mut axi, 0x8), (0xAA22_CC44, AxiResponse::Okay));
}

#[test]
fn sixty_four_bit_registers_use_eight_byte_stride() {
    let config = AxiConfig {
        data_width: DataWidth::Bits64,
        register_count: 2,
        ..AxiConfig::default()
    };
    let mut axi = AxiLiteRegisterFile::new(config).expect("valid config");
    write(&mut axi, 0x8, 0x0123_4567_89AB_CDEF, 0xFF);
    assert_eq!(axi.register(1), Some(0x0123_4567_89AB_CDEF));
    assert_eq!(read(&mut axi, 0x10).1, AxiResponse::DecErr);
}

#[test]
fn trace_records_transitions_in_edge_order() {
    let mut axi = slave();
    let mut trace = Vec::new();
    write_transaction(
        &mut axi,
        0x0,
        7,
        0xF,
        TransactionLimits::default(),
        &mut trace,
    )
    .expect("write completes");

    let writes: Vec<(u64, WriteState)> = trace
        .iter()
        .filter_map(|event| match event {
            TraceEvent::AxiWriteTransition { edge, to, .. } => Some((*edge, *to)),
            _ => None,
        })
        .collect();
    assert_eq!(
        writes,
        vec![
            (1, WriteState::AddressLatch),
            (2, WriteState::DataIn),
            (3, WriteState::ResponseOut),
            (4, WriteState::Idle),
        ]
    );
    assert!(trace
        .iter()
        .any(|event| matches!(event, TraceEvent::AxiRegisterWrite { index: 0, value: 7, .. })));
}

#[test]
fn valid_never_rises_before_address_ready() {
    let mut axi = slave();
    let request = AxiInputs {
        read_request: true,
        write_request: true,
        addr: 0x4,
        write_data: 1,
        write_strobe: 0xF,
        ..AxiInputs::default()
    };

    let mut seen_read_addr_ready = false;
    let mut seen_write_addr_ready = false;
    let mut seen_write_data_ready = false;
    for _ in 0..4 {
        let out = axi.step(true, &request);
        seen_read_addr_ready |= out.read_addr_ready;
        seen_write_addr_ready |= out.write_addr_ready;
        if out.read_valid {
            assert!(seen_read_addr_ready);
        }
        seen_write_data_ready |= out.write_data_ready;
        if out.write_resp_valid {
            assert!(seen_write_addr_ready && seen_write_data_ready);
        }
    }
    assert_eq!(axi.read_state(), ReadState::DataOut);
    assert_eq!(axi.write_state(), WriteState::ResponseOut);
}

#[rstest]
#[case::read_address_latch(&[AxiInputs { read_request: true, ..AxiInputs::default() }])]
#[case::read_data_out(&[AxiInputs { read_request: true, ..AxiInputs::default() }; 2])]
#[case::read_address_error(&[AxiInputs { read_request: true, addr: 0x40, ..AxiInputs::default() }; 2])]
#[case::write_address_latch(&[AxiInputs { write_request: true, ..AxiInputs::default() }])]
#[case::write_data_in(&[AxiInputs { write_request: true, ..AxiInputs::default() }; 2])]
#[case::write_response_out(&[AxiInputs { write_request: true, write_strobe: 0xF, write_data: 9, ..AxiInputs::default() }; 3])]
#[case::write_address_error(&[AxiInputs { write_request: true, addr: 0x40, ..AxiInputs::default() }; 2])]
fn reset_returns_every_state_to_idle(#[case] prelude: &[AxiInputs]) {
    let mut axi = slave();
    for inputs in prelude {
        axi.step(true, inputs);
    }
    assert!(
        axi.read_state() != ReadState::Idle || axi.write_state() != WriteState::Idle,
        "prelude leaves a channel busy"
    );
    let written = axi.registers().clone();

    reset_edge(&mut axi, &mut NullTrace);

    assert_eq!(axi.read_state(), ReadState::Idle);
    assert_eq!(axi.write_state(), WriteState::Idle);
    assert_eq!(axi.outputs(), AxiOutputs::IDLE);
    assert_eq!(axi.outputs().read_resp, AxiResponse::SlvErr);
    assert_eq!(axi.registers(), &written);
}

#[test]
fn reset_wins_over_simultaneous_requests() {
    let mut axi = slave();
    let inputs = AxiInputs {
        reset: true,
        read_request: true,
        write_request: true,
        read_ready: true,
        write_response_ready: true,
        ..AxiInputs::default()
    };
    for _ in 0..3 {
        assert_eq!(axi.step(true, &inputs), AxiOutputs::IDLE);
    }
    assert_eq!(axi.read_state(), ReadState::Idle);
    assert_eq!(axi.write_state(), WriteState::Idle);
}

proptest! {
    #[test]
    fn in_range_writes_read_back(index in 0_u64..4, data in any::<u32>()) {
        let mut axi = slave();
        let addr = index * 4;
        prop_assert_eq!(write(&mut axi, addr, u64::from(data), 0xF), AxiResponse::Okay);
        prop_assert_eq!(read(&mut axi, addr), (u64::from(data), AxiResponse::Okay));
    }

    #[test]
    fn out_of_range_accesses_report_decerr(addr in 0x10_u64..0x1_0000, data in any::<u32>()) {
        let mut axi = slave();
        prop_assert_eq!(write(&mut axi, addr, u64::from(data), 0xF), AxiResponse::DecErr);
        prop_assert_eq!(read(&mut axi, addr), (0, AxiResponse::DecErr));
        prop_assert!(axi.registers().as_slice().iter().all(|value| *value == 0));
    }

    #[test]
    fn strobe_controls_each_byte_lane(initial in any::<u32>(), data in any::<u32>(), strobe in 0_u8..16) {
        let mut axi = slave();
        write(&mut axi, 0xC, u64::from(initial), 0xF);
        write(&mut axi, 0xC, u64::from(data), strobe);
        let (value, _) = read(&mut axi, 0xC);
        for lane in 0..4_u32 {
            let source = if strobe & (1 << lane) != 0 { data } else { initial };
            prop_assert_eq!((value >> (lane * 8)) & 0xFF, u64::from((source >> (lane * 8)) & 0xFF));
        }
    }
}
