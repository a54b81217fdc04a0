//! SingleStepTests-shaped fixtures exercising the end-to-end scenarios and
//! the bus-trace-level scenario.
//!
//! These are inline literal fixtures, not a directory of `.json` files —
//! reading a corpus off disk is the external test runner's job, out of
//! scope for this crate. The fixtures below follow the corpus shape exactly
//! (`initial`/`final`/`cycles`) so the same `run_case` entry point a real
//! harness would use is what's under test here.

use nes6502_core::conformance::{self, TestCase};

fn case_from(json: &str) -> TestCase {
    serde_json::from_str(json).expect("fixture deserializes as a SingleStepTests case")
}

#[test]
fn test_scenario_1_adc_immediate_no_flags() {
    // PC=0x0200, A=0x10, P=0x20; 0x0200: 69 05 (ADC #$05). 2 cycles.
    let case = case_from(
        r#"{
        "name": "adc #$05",
        "initial": {"pc": 512, "a": 16, "x": 0, "y": 0, "s": 253, "p": 32,
                     "ram": [[512, 105], [513, 5]]},
        "final":   {"pc": 514, "a": 21, "x": 0, "y": 0, "s": 253, "p": 32,
                     "ram": [[512, 105], [513, 5]]},
        "cycles": [[512, 105, "read"], [513, 5, "read"]]
    }"#,
    );
    let result = conformance::run_case(&case);
    assert!(result.passed(), "{:?}", result.errors);
}

#[test]
fn test_scenario_2_adc_zero_page_carry_and_zero() {
    // A=0xFF, RAM[0x10]=0x01; 0x0200: 65 10 (ADC $10). 3 cycles, A=0x00 C=Z=1.
    let case = case_from(
        r#"{
        "name": "adc $10 carry",
        "initial": {"pc": 512, "a": 255, "x": 0, "y": 0, "s": 253, "p": 32,
                     "ram": [[512, 101], [513, 16], [16, 1]]},
        "final":   {"pc": 514, "a": 0, "x": 0, "y": 0, "s": 253, "p": 35,
                     "ram": [[512, 101], [513, 16], [16, 1]]},
        "cycles": [[512, 101, "read"], [513, 16, "read"], [16, 1, "read"]]
    }"#,
    );
    let result = conformance::run_case(&case);
    assert!(result.passed(), "{:?}", result.errors);
}

#[test]
fn test_scenario_3_adc_zero_page_signed_overflow() {
    // A=0x80, RAM[0x10]=0x80; result A=0x00, C=1, Z=1, V=1, N=0 -> P=0x63.
    let case = case_from(
        r#"{
        "name": "adc $10 overflow",
        "initial": {"pc": 512, "a": 128, "x": 0, "y": 0, "s": 253, "p": 32,
                     "ram": [[512, 101], [513, 16], [16, 128]]},
        "final":   {"pc": 514, "a": 0, "x": 0, "y": 0, "s": 253, "p": 99,
                     "ram": [[512, 101], [513, 16], [16, 128]]},
        "cycles": [[512, 101, "read"], [513, 16, "read"], [16, 128, "read"]]
    }"#,
    );
    let result = conformance::run_case(&case);
    assert!(result.passed(), "{:?}", result.errors);
}

#[test]
fn test_scenario_4_lda_zero_page_x_wraps_and_dummy_reads() {
    // A=0x42, X=0x03, RAM[0x0013]=0x77; 0x0200: B5 10 (LDA $10,X). 4 cycles.
    let case = case_from(
        r#"{
        "name": "lda $10,x",
        "initial": {"pc": 512, "a": 66, "x": 3, "y": 0, "s": 253, "p": 32,
                     "ram": [[512, 181], [513, 16], [19, 119]]},
        "final":   {"pc": 514, "a": 119, "x": 3, "y": 0, "s": 253, "p": 32,
                     "ram": [[512, 181], [513, 16], [19, 119]]},
        "cycles": [[512, 181, "read"], [513, 16, "read"], [16, 0, "read"], [19, 119, "read"]]
    }"#,
    );
    let result = conformance::run_case(&case);
    assert!(result.passed(), "{:?}", result.errors);
}

#[test]
fn test_scenario_5_bcs_taken_no_page_cross() {
    // X=0x05, PC=0x0200, P=0x21 (C=1); 0x0200: B0 10 (BCS +0x10). Taken, 3 cycles.
    let case = case_from(
        r#"{
        "name": "bcs +0x10 taken",
        "initial": {"pc": 512, "a": 0, "x": 5, "y": 0, "s": 253, "p": 33,
                     "ram": [[512, 176], [513, 16]]},
        "final":   {"pc": 530, "a": 0, "x": 5, "y": 0, "s": 253, "p": 33,
                     "ram": [[512, 176], [513, 16]]},
        "cycles": [[512, 176, "read"], [513, 16, "read"], [514, 0, "read"]]
    }"#,
    );
    let result = conformance::run_case(&case);
    assert!(result.passed(), "{:?}", result.errors);
}

#[test]
fn test_scenario_6_jsr_pushes_return_address_minus_one() {
    // PC=0x01FE, S=0xFD; 0x01FE: 20 34 12 (JSR $1234). 6 cycles.
    let case = case_from(
        r#"{
        "name": "jsr $1234",
        "initial": {"pc": 510, "a": 0, "x": 0, "y": 0, "s": 253, "p": 32,
                     "ram": [[510, 32], [511, 52], [512, 18]]},
        "final":   {"pc": 4660, "a": 0, "x": 0, "y": 0, "s": 251, "p": 32,
                     "ram": [[510, 32], [511, 52], [512, 18], [509, 2], [508, 0]]},
        "cycles": [[510, 32, "read"], [511, 52, "read"], [509, 0, "read"],
                    [509, 2, "write"], [508, 0, "write"], [512, 18, "read"]]
    }"#,
    );
    let result = conformance::run_case(&case);
    assert!(result.passed(), "{:?}", result.errors);
}

#[test]
fn test_cycle_trace_lda_absolute_x_page_cross_dummy_read() {
    // 0x0200: BD FF 12 (LDA $12FF,X), X=0x01 crosses from page 0x12 into
    // 0x13. T3 must still issue a bus transaction (a dummy read at the
    // uncorrected address) even though its value is discarded, before T4's
    // real read at the corrected address.
    let case = case_from(
        r#"{
        "name": "lda $12ff,x page cross",
        "initial": {"pc": 512, "a": 0, "x": 1, "y": 0, "s": 253, "p": 32,
                     "ram": [[512, 189], [513, 255], [514, 18], [4864, 85]]},
        "final":   {"pc": 515, "a": 85, "x": 1, "y": 0, "s": 253, "p": 32,
                     "ram": [[512, 189], [513, 255], [514, 18], [4864, 85]]},
        "cycles": [[512, 189, "read"], [513, 255, "read"], [514, 18, "read"],
                    [4608, 0, "read"], [4864, 85, "read"]]
    }"#,
    );
    let result = conformance::run_case(&case);
    assert!(result.passed(), "{:?}", result.errors);
}

#[test]
fn test_cycle_trace_lda_indirect_indexed_page_cross_dummy_read() {
    // 0x0200: B1 10 (LDA ($10),Y), pointer at $10/$11 = $12FF, Y=0x01
    // crosses from page 0x12 into 0x13. Same T3-must-issue-a-transaction
    // requirement as the Absolute,X/Y case, one addressing mode over.
    let case = case_from(
        r#"{
        "name": "lda ($10),y page cross",
        "initial": {"pc": 512, "a": 0, "x": 0, "y": 1, "s": 253, "p": 32,
                     "ram": [[512, 177], [513, 16], [16, 255], [17, 18], [4864, 102]]},
        "final":   {"pc": 514, "a": 102, "x": 0, "y": 1, "s": 253, "p": 32,
                     "ram": [[512, 177], [513, 16], [16, 255], [17, 18], [4864, 102]]},
        "cycles": [[512, 177, "read"], [513, 16, "read"], [16, 255, "read"],
                    [17, 18, "read"], [4608, 0, "read"], [4864, 102, "read"]]
    }"#,
    );
    let result = conformance::run_case(&case);
    assert!(result.passed(), "{:?}", result.errors);
}

#[test]
fn test_cycle_trace_asl_absolute_x_double_write() {
    // 0x0200: 1E 10 20 (ASL $2010,X), X=0x05. 7-cycle trace with the RMW
    // double-write: dummy write of the original value, then the real one.
    let case = case_from(
        r#"{
        "name": "asl $2010,x",
        "initial": {"pc": 512, "a": 0, "x": 5, "y": 0, "s": 253, "p": 32,
                     "ram": [[512, 30], [513, 16], [514, 32], [8213, 129]]},
        "final":   {"pc": 515, "a": 0, "x": 5, "y": 0, "s": 253, "p": 33,
                     "ram": [[512, 30], [513, 16], [514, 32], [8213, 2]]},
        "cycles": [[512, 30, "read"], [513, 16, "read"], [514, 32, "read"],
                    [8213, 129, "read"], [8213, 129, "read"],
                    [8213, 129, "write"], [8213, 2, "write"]]
    }"#,
    );
    let result = conformance::run_case(&case);
    assert!(result.passed(), "{:?}", result.errors);
}

#[test]
fn test_trace_mismatch_is_reported_not_panicked() {
    let case = case_from(
        r#"{
        "name": "deliberately wrong",
        "initial": {"pc": 512, "a": 16, "x": 0, "y": 0, "s": 253, "p": 32,
                     "ram": [[512, 105], [513, 5]]},
        "final":   {"pc": 514, "a": 21, "x": 0, "y": 0, "s": 253, "p": 32,
                     "ram": [[512, 105], [513, 5]]},
        "cycles": [[512, 105, "write"], [513, 5, "read"]]
    }"#,
    );
    let result = conformance::run_case(&case);
    assert!(!result.passed());
}

#[test]
fn test_state_mismatch_is_reported_field_by_field() {
    let case = case_from(
        r#"{
        "name": "wrong expected register",
        "initial": {"pc": 512, "a": 16, "x": 0, "y": 0, "s": 253, "p": 32,
                     "ram": [[512, 105], [513, 5]]},
        "final":   {"pc": 514, "a": 99, "x": 0, "y": 0, "s": 253, "p": 32,
                     "ram": [[512, 105], [513, 5]]},
        "cycles": [[512, 105, "read"], [513, 5, "read"]]
    }"#,
    );
    let result = conformance::run_case(&case);
    assert!(!result.passed());
    assert!(result
        .errors
        .iter()
        .any(|e| matches!(e, nes6502_core::error::CoreError::StateMismatch { field: "a", .. })));
}
