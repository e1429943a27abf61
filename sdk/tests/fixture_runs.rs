//! Fixture-driven runs wired the way the `market-actions` binary wires them

use market_sdk::{
    ActionFixture, ExtendIncentivesAction, ExtendIncentivesParams, FixedClock, MarketAction, MarketActionContext,
    RefundIncentivesAction, RefundIncentivesParams, SdkConfig, SdkError, StaticContractRegistry,
};
use market_types::{ContractId, FunctionName};
use std::{path::PathBuf, sync::Arc};

fn repo_file(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("..").join(name)
}

fn context<P>(config: &SdkConfig, fixture: &ActionFixture<P>) -> Arc<MarketActionContext> {
    let readers = fixture.readers().unwrap();
    let now = fixture.now.expect("demo fixtures pin the clock");
    Arc::new(
        MarketActionContext::new(
            Arc::new(readers.market),
            Arc::new(readers.quotes),
            Arc::new(readers.allowances),
            Arc::new(StaticContractRegistry::from_config(config).unwrap()),
        )
        .with_config(config)
        .with_clock(Arc::new(FixedClock::new(now))),
    )
}

#[test]
fn test_sample_config_is_valid() {
    let config = SdkConfig::from_file(repo_file("market-actions.toml")).unwrap();
    assert_eq!(config.tokens.len(), 2);
    assert!(config.wrapped_vault(1).is_ok());
    assert!(matches!(config.wrapped_vault(10), Err(SdkError::UnsupportedChain(10))));
}

#[tokio::test]
async fn test_extend_demo_fixture() {
    let config = SdkConfig::from_file(repo_file("market-actions.toml")).unwrap();
    let fixture: ActionFixture<ExtendIncentivesParams> =
        ActionFixture::from_file(repo_file("demos/extend_fixture.json")).unwrap();

    let prepared = ExtendIncentivesAction::new(context(&config, &fixture))
        .prepare(&fixture.request)
        .await;

    assert!(prepared.is_valid.status, "{}", prepared.is_valid.message);
    assert!(prepared.can_be_performed_completely);

    let options = prepared.write_contract_options.options();
    assert_eq!(options.len(), 2);
    assert_eq!(options[0].contract_id, ContractId::Erc20);
    assert_eq!(options[0].label, "Approve PTS");
    assert_eq!(options[1].function_name, FunctionName::ExtendRewardsInterval);
    assert_eq!(options[1].label, "Extend Reward PTS");

    // 1.0 PTS at $2
    assert_eq!(prepared.incentive_data[0].token_amount_usd, 2.0);
    assert_eq!(prepared.input_token_data.quote.symbol, "USDC");
}

#[tokio::test]
async fn test_refund_demo_fixture() {
    let config = SdkConfig::from_file(repo_file("market-actions.toml")).unwrap();
    let fixture: ActionFixture<RefundIncentivesParams> =
        ActionFixture::from_file(repo_file("demos/refund_fixture.json")).unwrap();

    let prepared = RefundIncentivesAction::new(context(&config, &fixture))
        .prepare(&fixture.request)
        .await;

    assert!(prepared.is_valid.status, "{}", prepared.is_valid.message);
    let options = prepared.write_contract_options.options();
    assert_eq!(options.len(), 1);
    assert_eq!(options[0].function_name, FunctionName::RefundRewardsInterval);
    assert_eq!(prepared.incentive_data[0].token_amount, 5.0);

    let json = serde_json::to_value(&prepared).unwrap();
    assert_eq!(json["writeContractOptions"][0]["txStatus"], "idle");
    assert!(json["writeContractOptions"][0]["txHash"].is_null());
}
