#![no_main]

use libfuzzer_sys::fuzz_target;
use rtlsim_core::{
    decode_index, AxiConfig, AxiInputs, AxiLiteRegisterFile, AxiResponse, DecodedAddress,
    ReadState, WriteState,
};

const BYTES_PER_EDGE: usize = 4;

fuzz_target!(|data: &[u8]| {
    let config = AxiConfig::default();
    let Ok(mut slave) = AxiLiteRegisterFile::new(config) else {
        return;
    };

    for chunk in data.chunks_exact(BYTES_PER_EDGE) {
        let flags = chunk[0];
        let inputs = AxiInputs {
            reset: flags & 0x01 != 0 && flags & 0x80 != 0,
            read_request: flags & 0x02 != 0,
            write_request: flags & 0x04 != 0,
            read_ready: flags & 0x08 != 0,
            write_response_ready: flags & 0x10 != 0,
            addr: u64::from(chunk[1]),
            write_data: u64::from(u16::from_be_bytes([chunk[2], chunk[3]])),
            write_strobe: chunk[3] & 0x0F,
        };
        let before = slave.registers().clone();
        let write_state = slave.write_state();
        let clk_edge = flags & 0x20 == 0;
        let out = slave.step(clk_edge, &inputs);

        if out.read_valid {
            assert!(matches!(
                slave.read_state(),
                ReadState::DataOut | ReadState::AddressError
            ));
            assert_ne!(out.read_resp, AxiResponse::SlvErr);
        }
        if out.write_resp_valid {
            assert!(matches!(
                slave.write_state(),
                WriteState::ResponseOut | WriteState::AddressError
            ));
        }
        if inputs.reset && clk_edge {
            assert!(!out.read_valid && !out.write_resp_valid);
            assert_eq!(slave.registers(), &before);
        }
        if write_state != WriteState::DataIn || !clk_edge {
            assert_eq!(slave.registers(), &before);
        }
        if let DecodedAddress::Register(index) = decode_index(&config, inputs.addr) {
            assert!(index < config.register_count);
        }
    }
});
