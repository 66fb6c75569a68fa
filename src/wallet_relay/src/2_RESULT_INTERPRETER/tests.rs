//! Reply classification tests

use candid::{encode_args, encode_one, CandidType, Deserialize, Nat, Principal};

use super::*;
use crate::_3_CALL_RELAY::ResultEnvelope;
use crate::infrastructure::InterpretError;
use crate::types::icrc::{ApproveError, ApproveResult};
use crate::types::kongswap::{AddLiquidityReply, AddLiquidityResult, SwapReply, SwapResult};

fn envelope(method: &str, reply: Vec<u8>) -> ResultEnvelope {
    ResultEnvelope {
        target: Principal::from_text("ryjl3-tyaaa-aaaaa-aaaba-cai").unwrap(),
        method: method.to_string(),
        reply,
    }
}

/// An approve reply with an error case no current ledger defines
#[derive(CandidType, Deserialize)]
enum FutureApproveError {
    QuotaExceeded { retry_after: u64 },
}

/// Legacy "record of optional arms" reply shape
#[derive(CandidType, Deserialize)]
struct OptionalArms {
    #[serde(rename = "Ok")]
    ok: Option<Nat>,
    #[serde(rename = "Err")]
    err: Option<ApproveError>,
}

fn swap_reply() -> SwapReply {
    SwapReply {
        tx_id: 42,
        status: "Success".to_string(),
        pay_symbol: "ICP".to_string(),
        pay_amount: Nat::from(100_000_000u64),
        receive_symbol: "ckUSDT".to_string(),
        receive_amount: Nat::from(9_870_000u64),
        price: 9.87,
        slippage: 0.12,
        ts: 1_700_000_000_000_000_000,
    }
}

// ===== approve =====

#[test]
fn test_approve_ok_is_approved() {
    let result: ApproveResult = Ok(Nat::from(1234u64));
    let outcome = interpret_approve(&envelope("icrc2_approve", encode_one(&result).unwrap())).unwrap();
    assert_eq!(outcome, ApproveOutcome::Approved { block_index: Nat::from(1234u64) });
    assert!(outcome.is_approved());
}

#[test]
fn test_insufficient_funds_keeps_balance() {
    let result: ApproveResult = Err(ApproveError::InsufficientFunds { balance: Nat::from(500u64) });
    let outcome = interpret_approve(&envelope("icrc2_approve", encode_one(&result).unwrap())).unwrap();

    match outcome {
        ApproveOutcome::Rejected(err) => {
            assert_eq!(err, ApproveError::InsufficientFunds { balance: Nat::from(500u64) });
            assert_eq!(err.kind(), "InsufficientFunds");
            assert!(err.describe().contains("500"));
            assert!(!err.is_transient());
        }
        other => panic!("expected rejection, got {:?}", other),
    }
}

#[test]
fn test_every_approve_error_round_trips_as_rejection() {
    let cases = vec![
        ApproveError::GenericError { message: "boom".to_string(), error_code: Nat::from(7u64) },
        ApproveError::TemporarilyUnavailable,
        ApproveError::Duplicate { duplicate_of: Nat::from(9u64) },
        ApproveError::BadFee { expected_fee: Nat::from(10_000u64) },
        ApproveError::AllowanceChanged { current_allowance: Nat::from(3u64) },
        ApproveError::CreatedInFuture { ledger_time: 11 },
        ApproveError::TooOld,
        ApproveError::Expired { ledger_time: 12 },
        ApproveError::InsufficientFunds { balance: Nat::from(0u64) },
    ];

    for case in cases {
        let result: ApproveResult = Err(case.clone());
        let outcome = interpret_approve(&envelope("icrc2_approve", encode_one(&result).unwrap())).unwrap();
        assert_eq!(outcome, ApproveOutcome::Rejected(case));
    }
}

#[test]
fn test_transient_rejections() {
    assert!(ApproveError::TemporarilyUnavailable.is_transient());
    assert!(ApproveError::TooOld.is_transient());
    assert!(ApproveError::CreatedInFuture { ledger_time: 1 }.is_transient());
    assert!(!ApproveError::BadFee { expected_fee: Nat::from(1u64) }.is_transient());
}

#[test]
fn test_unknown_error_tag_is_unknown_result() {
    let result: std::result::Result<Nat, FutureApproveError> =
        Err(FutureApproveError::QuotaExceeded { retry_after: 60 });
    let err = interpret_approve(&envelope("icrc2_approve", encode_one(&result).unwrap())).unwrap_err();
    assert!(matches!(err, InterpretError::UnknownResult { ref operation, .. } if operation == "icrc2_approve"));
}

#[test]
fn test_both_arms_populated_is_unknown_result() {
    let reply = OptionalArms {
        ok: Some(Nat::from(1u64)),
        err: Some(ApproveError::TooOld),
    };
    let err = interpret_approve(&envelope("icrc2_approve", encode_one(&reply).unwrap())).unwrap_err();
    assert!(matches!(err, InterpretError::UnknownResult { .. }));
}

#[test]
fn test_neither_arm_populated_is_unknown_result() {
    let reply = OptionalArms { ok: None, err: None };
    let err = interpret_approve(&envelope("icrc2_approve", encode_one(&reply).unwrap())).unwrap_err();
    assert!(matches!(err, InterpretError::UnknownResult { .. }));
}

#[test]
fn test_non_candid_reply_is_decode_error() {
    let err = interpret_approve(&envelope("icrc2_approve", b"not candid".to_vec())).unwrap_err();
    assert!(matches!(err, InterpretError::Decode { .. }));
}

// ===== dex =====

#[test]
fn test_swap_ok_is_completed() {
    let result: SwapResult = Ok(swap_reply());
    let outcome = interpret_swap(&envelope("swap", encode_one(&result).unwrap())).unwrap();
    assert_eq!(outcome, DexOutcome::Completed(swap_reply()));
    assert!(outcome.is_completed());
}

#[test]
fn test_swap_err_text_is_preserved() {
    let result: SwapResult = Err("Slippage exceeded. Can only receive 9.1 ckUSDT".to_string());
    let outcome = interpret_swap(&envelope("swap", encode_one(&result).unwrap())).unwrap();
    assert_eq!(outcome, DexOutcome::Rejected("Slippage exceeded. Can only receive 9.1 ckUSDT".to_string()));
}

#[test]
fn test_swap_reply_with_wrong_shape_is_unknown_result() {
    let result: std::result::Result<u64, String> = Ok(5);
    let err = interpret_swap(&envelope("swap", encode_one(&result).unwrap())).unwrap_err();
    assert!(matches!(err, InterpretError::UnknownResult { ref operation, .. } if operation == "swap"));
}

#[test]
fn test_add_liquidity_ok_is_completed() {
    let reply = AddLiquidityReply {
        tx_id: 7,
        status: "Success".to_string(),
        symbol: "ICP_ckUSDT".to_string(),
        symbol_0: "ICP".to_string(),
        amount_0: Nat::from(100_000_000u64),
        symbol_1: "ckUSDT".to_string(),
        amount_1: Nat::from(9_870_000u64),
        add_lp_token_amount: Nat::from(31_000u64),
        ts: 1,
    };
    let result: AddLiquidityResult = Ok(reply.clone());
    let outcome = interpret_add_liquidity(&envelope("add_liquidity", encode_one(&result).unwrap())).unwrap();
    assert_eq!(outcome, DexOutcome::Completed(reply));
}

#[test]
fn test_add_liquidity_err_is_rejected() {
    let result: AddLiquidityResult = Err("Pool not found".to_string());
    let outcome = interpret_add_liquidity(&envelope("add_liquidity", encode_one(&result).unwrap())).unwrap();
    assert_eq!(outcome, DexOutcome::Rejected("Pool not found".to_string()));
}

// ===== generic =====

#[test]
fn test_generic_text_reply() {
    let reply = interpret_generic(&envelope("getMessage", encode_one("Hello, world!").unwrap())).unwrap();
    assert_eq!(reply.text.as_deref(), Some("Hello, world!"));
    assert!(reply.rendered.contains("Hello, world!"));
}

#[test]
fn test_generic_multi_value_reply_has_no_text() {
    let bytes = encode_args(("a".to_string(), 5u64)).unwrap();
    let reply = interpret_generic(&envelope("pair", bytes)).unwrap();
    assert!(reply.text.is_none());
    assert!(reply.rendered.contains('5'));
}

#[test]
fn test_generic_garbage_is_decode_error() {
    let err = interpret_generic(&envelope("getMessage", vec![1, 2, 3])).unwrap_err();
    assert!(matches!(err, InterpretError::Decode { ref operation, .. } if operation == "getMessage"));
}

#[test]
fn test_decode_text_requires_text() {
    let ok = decode_text(&envelope("getMessage", encode_one("hi").unwrap())).unwrap();
    assert_eq!(ok, "hi");

    let err = decode_text(&envelope("getMessage", encode_one(5u64).unwrap())).unwrap_err();
    assert!(matches!(err, InterpretError::UnknownResult { .. }));
}
