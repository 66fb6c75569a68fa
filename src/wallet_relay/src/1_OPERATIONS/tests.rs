//! End-to-end template tests against the in-memory transport

use candid::{decode_args, decode_one, encode_one, CandidType, Nat, Principal};
use ic_ledger_types::Tokens;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_bytes::ByteBuf;

use super::approve::ApproveRequest;
use super::liquidity::AddLiquidityRequest;
use super::query::CallRequest;
use super::swap::SwapRequest;
use super::*;
use crate::_2_RESULT_INTERPRETER::{ApproveOutcome, DexOutcome};
use crate::_3_CALL_RELAY::transport::mock::{MockConnector, MockTransport};
use crate::_3_CALL_RELAY::transport::TransportFailure;
use crate::_4_ACCOUNTS::identity::CreatedIdentity;
use crate::_5_INFORMATIONAL::observer::RecordingObserver;
use crate::infrastructure::{
    CallerError, ConfigError, FixedClock, IdentityError, InterpretError, OracleError, RelayError, ValidationError,
    ACCOUNT_BALANCE_METHOD, DEADLINE_WINDOW_NANOS, ICP_LEDGER_ID, ICRC2_APPROVE_METHOD, KONGSWAP_BACKEND_ID,
    WALLET_CALL_METHOD,
};
use crate::types::icrc::{ApproveArgs, ApproveError, ApproveResult};
use crate::types::kongswap::{AddLiquidityResult, SwapArgs, SwapReply, SwapResult};
use crate::types::wallet::{WalletCallArgs, WalletCallReply, WalletCallResult};

const WALLET: &str = "be2us-64aaa-aaaaa-qaabq-cai";
const NOW: u64 = 1_700_000_000_000_000_000;

struct Harness {
    _dir: tempfile::TempDir,
    transport: MockTransport,
    connector: MockConnector,
    operator: Operator<MockConnector, FixedClock, RecordingObserver>,
    caller: CreatedIdentity,
}

impl Harness {
    fn new(log_balances: bool) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = RelayConfig {
            wallet_canister: Some(WALLET.to_string()),
            identity_dir: dir.path().to_path_buf(),
            account_book: dir.path().join("account.txt"),
            log_balances,
            ..RelayConfig::default()
        };
        let transport = MockTransport::new();
        let connector = MockConnector::new(transport.clone());
        let operator = Operator::with_parts(connector.clone(), FixedClock(NOW), RecordingObserver::default(), config);
        let caller = operator.store().create().unwrap();

        Self { _dir: dir, transport, connector, operator, caller }
    }

    fn label(&self) -> String {
        self.caller.principal.to_text()
    }

    fn balance(&self, e8s: u64) {
        self.transport
            .reply(ACCOUNT_BALANCE_METHOD, Ok(encode_one(Tokens::from_e8s(e8s)).unwrap()));
    }

    fn wallet_returns<T: CandidType>(&self, inner: &T) {
        let result: WalletCallResult = Ok(WalletCallReply { return_: ByteBuf::from(encode_one(inner).unwrap()) });
        self.transport.reply(WALLET_CALL_METHOD, Ok(encode_one(&result).unwrap()));
    }

    /// The single wallet_call that went out
    fn sent(&self) -> WalletCallArgs {
        let calls: Vec<_> = self
            .transport
            .calls()
            .into_iter()
            .filter(|c| c.method == WALLET_CALL_METHOD)
            .collect();
        assert_eq!(calls.len(), 1, "expected exactly one wallet_call");
        decode_one(&calls[0].arg).unwrap()
    }

    fn call_kinds(&self) -> Vec<&'static str> {
        self.transport.calls().iter().map(|c| c.kind).collect()
    }
}

fn approve_request(h: &Harness, amount: Decimal) -> ApproveRequest {
    ApproveRequest::icp(h.label(), KONGSWAP_BACKEND_ID, amount)
}

// ===== approve =====

#[tokio::test]
async fn test_approve_insufficient_funds_is_reported_not_raised() {
    let h = Harness::new(true);
    h.balance(150_000_000);
    h.wallet_returns(&ApproveResult::Err(ApproveError::InsufficientFunds { balance: Nat::from(500u64) }));
    h.balance(150_000_000);

    let report = h.operator.approve(&approve_request(&h, dec!(2))).await.unwrap();

    assert_eq!(
        report.outcome,
        ApproveOutcome::Rejected(ApproveError::InsufficientFunds { balance: Nat::from(500u64) })
    );
    assert_eq!(report.kind, OperationKind::Approve);
    assert_eq!(report.caller, h.caller.principal);
    assert_eq!(report.account_id, h.caller.account_id);
    assert_eq!(report.balance_before, Some(BalanceReading::Known(dec!(1.5))));
    assert_eq!(report.balance_delta(), Some(Decimal::ZERO));
    assert_eq!(h.call_kinds(), vec!["query", "update", "query"]);

    let events = h.operator.observer().events();
    assert!(events.iter().any(|e| e.starts_with("outcome false rejected (InsufficientFunds)")));
    assert!(!events.iter().any(|e| e.starts_with("failure")));
}

#[tokio::test]
async fn test_approve_args_on_the_wire() {
    let h = Harness::new(false);
    h.wallet_returns(&ApproveResult::Ok(Nat::from(99u64)));

    let report = h.operator.approve(&approve_request(&h, dec!(2))).await.unwrap();
    assert_eq!(report.outcome, ApproveOutcome::Approved { block_index: Nat::from(99u64) });
    assert!(report.balance_before.is_none());
    assert!(report.balance_after.is_none());
    assert_eq!(h.call_kinds(), vec!["update"]);

    let sent = h.sent();
    assert_eq!(sent.canister, Principal::from_text(ICP_LEDGER_ID).unwrap());
    assert_eq!(sent.method_name, ICRC2_APPROVE_METHOD);
    assert_eq!(sent.cycles, 200_000_000);

    let (args,): (ApproveArgs,) = decode_args(&sent.args).unwrap();
    assert_eq!(args.amount, Nat::from(200_000_000u64));
    assert_eq!(args.spender.owner, Principal::from_text(KONGSWAP_BACKEND_ID).unwrap());
    assert_eq!(args.created_at_time, Some(NOW));
    assert_eq!(args.expires_at, Some(NOW + DEADLINE_WINDOW_NANOS));

    // the relay signed as the caller
    assert_eq!(h.connector.connected(), vec![Some(h.caller.principal)]);
}

#[tokio::test]
async fn test_failed_balance_snapshot_does_not_abort() {
    let h = Harness::new(true);
    h.transport
        .reply(ACCOUNT_BALANCE_METHOD, Err(TransportFailure::Unreachable("boundary node down".to_string())));
    h.wallet_returns(&ApproveResult::Ok(Nat::from(1u64)));

    let report = h.operator.approve(&approve_request(&h, dec!(1))).await.unwrap();
    assert!(report.outcome.is_approved());
    assert!(matches!(report.balance_before, Some(BalanceReading::Unavailable(_))));
    assert!(report.balance_delta().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_hung_balance_snapshot_is_bounded() {
    let h = Harness::new(true);
    h.transport.delay_queries(std::time::Duration::from_secs(120));
    h.wallet_returns(&ApproveResult::Ok(Nat::from(1u64)));

    let report = h.operator.approve(&approve_request(&h, dec!(1))).await.unwrap();
    assert!(report.outcome.is_approved());
    assert_eq!(
        report.balance_before,
        Some(BalanceReading::Unavailable(OracleError::Timeout { seconds: 30 }))
    );
    assert_eq!(
        report.balance_after,
        Some(BalanceReading::Unavailable(OracleError::Timeout { seconds: 30 }))
    );
}

#[tokio::test]
async fn test_invalid_spender_fails_before_connecting() {
    let h = Harness::new(true);
    let mut request = approve_request(&h, dec!(1));
    request.spender = "not-a-principal".to_string();

    let err = h.operator.approve(&request).await.unwrap_err();
    assert!(matches!(err, CallerError::Validation(ValidationError::InvalidPrincipal { .. })));
    assert!(h.connector.connected().is_empty());
    assert!(h.transport.calls().is_empty());
}

#[tokio::test]
async fn test_negative_amount_rejected() {
    let h = Harness::new(true);
    let err = h.operator.approve(&approve_request(&h, dec!(-1))).await.unwrap_err();
    assert!(matches!(err, CallerError::Validation(ValidationError::InvalidAmount { .. })));
    assert!(h.transport.calls().is_empty());
}

#[tokio::test]
async fn test_unknown_identity_is_not_found() {
    let h = Harness::new(true);
    let mut request = approve_request(&h, dec!(1));
    request.caller = "nobody".to_string();

    let err = h.operator.approve(&request).await.unwrap_err();
    assert!(matches!(err, CallerError::Identity(IdentityError::NotFound { .. })));
    assert!(h.connector.connected().is_empty());
    assert!(h.operator.observer().events().iter().any(|e| e.starts_with("failure")));
}

#[tokio::test]
async fn test_missing_wallet_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = RelayConfig { identity_dir: dir.path().to_path_buf(), ..RelayConfig::default() };
    let operator = Operator::with_parts(
        MockConnector::new(MockTransport::new()),
        FixedClock(NOW),
        RecordingObserver::default(),
        config,
    );
    let caller = operator.store().create().unwrap();

    let err = operator
        .approve(&ApproveRequest::icp(caller.principal.to_text(), KONGSWAP_BACKEND_ID, dec!(1)))
        .await
        .unwrap_err();
    assert!(matches!(err, CallerError::Config(ConfigError::Missing { .. })));
}

#[tokio::test]
async fn test_lost_submission_surfaces_as_outcome_unknown() {
    let h = Harness::new(false);
    h.transport
        .reply(WALLET_CALL_METHOD, Err(TransportFailure::Failed("connection reset".to_string())));

    let err = h.operator.approve(&approve_request(&h, dec!(1))).await.unwrap_err();
    match err {
        CallerError::Relay(relay) => assert!(relay.outcome_unknown()),
        other => panic!("expected relay error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_wallet_refusal_is_authorization_error() {
    let h = Harness::new(false);
    let refused: WalletCallResult = Err("Unauthorized: not a custodian".to_string());
    h.transport.reply(WALLET_CALL_METHOD, Ok(encode_one(&refused).unwrap()));

    let err = h.operator.approve(&approve_request(&h, dec!(1))).await.unwrap_err();
    assert!(matches!(err, CallerError::Relay(RelayError::Authorization { .. })));
}

#[tokio::test]
async fn test_unexpected_reply_shape_is_unknown_result() {
    let h = Harness::new(false);
    h.wallet_returns(&42u64);

    let err = h.operator.approve(&approve_request(&h, dec!(1))).await.unwrap_err();
    assert!(matches!(err, CallerError::Interpret(InterpretError::UnknownResult { .. })));
}

// ===== swap / add liquidity =====

#[tokio::test]
async fn test_swap_goes_to_kongswap() {
    let h = Harness::new(false);
    let reply = SwapReply {
        tx_id: 5,
        status: "Success".to_string(),
        pay_symbol: "ICP".to_string(),
        pay_amount: Nat::from(100_000_000u64),
        receive_symbol: "ckUSDT".to_string(),
        receive_amount: Nat::from(9_870_000u64),
        price: 9.87,
        slippage: 0.1,
        ts: NOW,
    };
    h.wallet_returns(&SwapResult::Ok(reply.clone()));

    let request = SwapRequest {
        caller: h.label(),
        pay_token: "ICP".to_string(),
        pay_amount: dec!(1),
        pay_decimals: 8,
        receive_token: "ckUSDT".to_string(),
        receive_amount: None,
        receive_decimals: 6,
        max_slippage: 2.0,
        receive_address: None,
    };
    let report = h.operator.swap(&request).await.unwrap();
    assert_eq!(report.outcome, DexOutcome::Completed(reply));

    let sent = h.sent();
    assert_eq!(sent.canister, Principal::from_text(KONGSWAP_BACKEND_ID).unwrap());
    assert_eq!(sent.method_name, "swap");
    let (args,): (SwapArgs,) = decode_args(&sent.args).unwrap();
    assert_eq!(args.pay_amount, Nat::from(100_000_000u64));
    assert!(args.pay_tx_id.is_none());
}

#[tokio::test]
async fn test_invalid_slippage_never_reaches_kongswap() {
    let h = Harness::new(true);
    let request = SwapRequest {
        caller: h.label(),
        pay_token: "ICP".to_string(),
        pay_amount: dec!(1),
        pay_decimals: 8,
        receive_token: "ckUSDT".to_string(),
        receive_amount: None,
        receive_decimals: 6,
        max_slippage: 25.0,
        receive_address: None,
    };
    assert!(h.operator.swap(&request).await.is_err());
    assert!(h.transport.calls().is_empty());
}

#[tokio::test]
async fn test_add_liquidity_rejection_keeps_message() {
    let h = Harness::new(false);
    h.wallet_returns(&AddLiquidityResult::Err("Pool not found".to_string()));

    let request = AddLiquidityRequest {
        caller: h.label(),
        token_0: "ICP".to_string(),
        amount_0: dec!(1),
        decimals_0: 8,
        token_1: "ckUSDT".to_string(),
        amount_1: dec!(10),
        decimals_1: 6,
    };
    let report = h.operator.add_liquidity(&request).await.unwrap();
    assert_eq!(report.outcome, DexOutcome::Rejected("Pool not found".to_string()));
    assert_eq!(h.sent().method_name, "add_liquidity");
}

// ===== generic call =====

#[tokio::test]
async fn test_generic_call_sends_text_argument() {
    let h = Harness::new(false);
    h.wallet_returns(&"Hello, world!".to_string());

    let request = CallRequest {
        caller: h.label(),
        canister: "br5f7-7uaaa-aaaaa-qaaca-cai".to_string(),
        method: "greet".to_string(),
        arg: Some("world".to_string()),
    };
    let report = h.operator.call(&request).await.unwrap();
    assert_eq!(report.outcome.text.as_deref(), Some("Hello, world!"));

    let sent = h.sent();
    assert_eq!(sent.method_name, "greet");
    let (arg,): (String,) = decode_args(&sent.args).unwrap();
    assert_eq!(arg, "world");
}

#[tokio::test]
async fn test_generic_call_without_argument() {
    let h = Harness::new(false);
    h.wallet_returns(&"pong".to_string());

    let request = CallRequest {
        caller: h.label(),
        canister: "br5f7-7uaaa-aaaaa-qaaca-cai".to_string(),
        method: "getMessage".to_string(),
        arg: None,
    };
    h.operator.call(&request).await.unwrap();

    let sent = h.sent();
    let () = decode_args(&sent.args).unwrap();
}

// ===== wallets =====

#[tokio::test]
async fn test_refresh_uses_anonymous_queries() {
    let h = Harness::new(false);
    let records = h.operator.generate_batch(2, false).unwrap();
    h.balance(100_000_000);
    h.balance(250_000_000);

    let summary = h.operator.refresh_balances().await.unwrap();
    assert_eq!(summary.refreshed, 2);
    assert_eq!(h.connector.connected(), vec![None]);

    let refreshed = h.operator.account_book().records().unwrap();
    assert_eq!(refreshed[0].account_id, records[0].account_id);
    assert_eq!(refreshed[0].balance, dec!(1));
    assert_eq!(refreshed[1].balance, dec!(2.5));
}

#[test]
fn test_describe_wallet_by_label() {
    let h = Harness::new(false);
    let shown = h.operator.describe_wallet(&h.label()).unwrap();
    assert_eq!(shown, h.caller);

    assert!(matches!(
        h.operator.describe_wallet("nobody"),
        Err(CallerError::Identity(IdentityError::NotFound { .. }))
    ));
    assert!(h.transport.calls().is_empty());
}

#[tokio::test]
async fn test_balance_of_label() {
    let h = Harness::new(false);
    h.balance(42_000_000);

    let balance = h.operator.balance_of(&h.label()).await.unwrap();
    assert_eq!(balance, dec!(0.42));

    let calls = h.transport.calls();
    let (arg,): (crate::types::wallet::AccountBalanceArgs,) = decode_args(&calls[0].arg).unwrap();
    assert_eq!(arg.account, h.caller.account_id);
}

#[tokio::test]
async fn test_failed_balance_of_is_an_error_not_zero() {
    let h = Harness::new(false);
    h.transport
        .reply(ACCOUNT_BALANCE_METHOD, Err(TransportFailure::Rejected {
            code: "DestinationInvalid".to_string(),
            message: "no such canister".to_string(),
        }));

    let err = h.operator.balance_of(&h.label()).await.unwrap_err();
    assert!(matches!(err, CallerError::Oracle(_)));
}
