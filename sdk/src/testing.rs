//! Testing utilities for market actions
//!
//! Provides a canned market, quotes and a fully wired `MarketActionContext`
//! over in-memory readers.

use market_types::{
    Address, BaseMarket, EnrichedMarket, IncentiveBook, IncentiveInterval, MarketSnapshot, TokenDirectory, TokenId,
    TokenQuote, U256, WAD,
};
use std::sync::Arc;

use crate::{
    FixedClock, InMemoryAllowanceReader, InMemoryMarketReader, InMemoryQuoteResolver, MarketActionContext,
    SdkResult, StaticContractRegistry,
};

pub const CHAIN_ID: u64 = 1;
pub const NOW: u64 = 1_700_000_000;

pub const INCENTIVE_TOKEN_PRICE: f64 = 2.0;
pub const INCENTIVE_TOKEN_SYMBOL: &str = "PTS";
pub const INPUT_TOKEN_PRICE: f64 = 1.0;

pub fn vault_address() -> Address {
    Address::repeat_byte(0x11)
}

pub fn fee_recipient() -> Address {
    Address::repeat_byte(0x22)
}

pub fn account_address() -> Address {
    Address::repeat_byte(0x33)
}

pub fn incentive_token_address() -> Address {
    Address::repeat_byte(0xaa)
}

/// Mainnet token id for an address made of one repeated byte
pub fn token_id(byte: u8) -> TokenId {
    TokenId::from_parts("1", &Address::repeat_byte(byte))
}

pub fn incentive_token_id() -> TokenId {
    token_id(0xaa)
}

pub fn input_token_id() -> TokenId {
    token_id(0xbb)
}

pub fn interval(amount: U256, rate: U256, start: u64, end: u64) -> IncentiveInterval {
    IncentiveInterval {
        amount,
        rate,
        start_timestamp: start,
        end_timestamp: end,
    }
}

// ============================================================================
// Market Fixture
// ============================================================================

/// Builder for market snapshots; zero fees and no incentives by default
#[derive(Debug, Clone)]
pub struct MarketFixture {
    frontend_fee: U256,
    protocol_fee: U256,
    incentives: Vec<(TokenId, IncentiveInterval)>,
}

impl MarketFixture {
    pub fn new() -> Self {
        Self {
            frontend_fee: U256::ZERO,
            protocol_fee: U256::ZERO,
            incentives: Vec::new(),
        }
    }

    pub fn with_fees(mut self, frontend_fee: U256, protocol_fee: U256) -> Self {
        self.frontend_fee = frontend_fee;
        self.protocol_fee = protocol_fee;
        self
    }

    pub fn with_incentive(mut self, token_id: TokenId, interval: IncentiveInterval) -> Self {
        self.incentives.push((token_id, interval));
        self
    }

    pub fn build(self) -> MarketSnapshot {
        MarketSnapshot {
            base: BaseMarket {
                frontend_fee: self.frontend_fee,
                protocol_fee: self.protocol_fee,
                protocol_fee_recipient: fee_recipient(),
            },
            enriched: EnrichedMarket {
                market_id: vault_address(),
                input_token_id: input_token_id(),
                incentives: self.incentives.into_iter().collect::<IncentiveBook>(),
            },
        }
    }
}

impl Default for MarketFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// One incentive of 1e18 units at rate 0, running from `now - 500` to `now + 100`
pub fn scenario_market(now: u64) -> MarketSnapshot {
    MarketFixture::new()
        .with_incentive(incentive_token_id(), interval(WAD, U256::ZERO, now - 500, now + 100))
        .build()
}

pub fn default_quotes() -> Vec<TokenQuote> {
    vec![
        TokenQuote {
            token_id: incentive_token_id(),
            symbol: INCENTIVE_TOKEN_SYMBOL.to_string(),
            decimals: 18,
            price: INCENTIVE_TOKEN_PRICE,
        },
        TokenQuote {
            token_id: input_token_id(),
            symbol: "USDC".to_string(),
            decimals: 6,
            price: INPUT_TOKEN_PRICE,
        },
    ]
}

/// Registry with a wrapped vault on `CHAIN_ID` only
pub fn test_registry() -> SdkResult<StaticContractRegistry> {
    StaticContractRegistry::new([(CHAIN_ID, vault_address())])
}

// ============================================================================
// Harness
// ============================================================================

/// Action context over in-memory readers and a fixed clock at `NOW`
pub struct TestHarness {
    pub context: Arc<MarketActionContext>,
    pub allowances: Arc<InMemoryAllowanceReader>,
    pub clock: Arc<FixedClock>,
}

impl TestHarness {
    pub fn new(
        snapshot: MarketSnapshot,
        allowances: impl IntoIterator<Item = (Address, U256)>,
    ) -> SdkResult<Self> {
        allowances
            .into_iter()
            .fold(Self::builder(snapshot), |builder, (token, amount)| builder.allowance(token, amount))
            .build()
    }

    pub fn builder(snapshot: MarketSnapshot) -> TestHarnessBuilder {
        TestHarnessBuilder {
            snapshot,
            market_chain_id: CHAIN_ID,
            market_loading: false,
            allowances: Vec::new(),
            allowances_loading: false,
            quotes_loading: false,
            tokens: TokenDirectory::default(),
        }
    }
}

pub struct TestHarnessBuilder {
    snapshot: MarketSnapshot,
    market_chain_id: u64,
    market_loading: bool,
    allowances: Vec<(Address, U256)>,
    allowances_loading: bool,
    quotes_loading: bool,
    tokens: TokenDirectory,
}

impl TestHarnessBuilder {
    /// Chain the market is served on
    pub fn chain(mut self, chain_id: u64) -> Self {
        self.market_chain_id = chain_id;
        self
    }

    pub fn allowance(mut self, token: Address, amount: U256) -> Self {
        self.allowances.push((token, amount));
        self
    }

    pub fn allowances_loading(mut self) -> Self {
        self.allowances_loading = true;
        self
    }

    pub fn quotes_loading(mut self) -> Self {
        self.quotes_loading = true;
        self
    }

    pub fn market_loading(mut self) -> Self {
        self.market_loading = true;
        self
    }

    pub fn tokens(mut self, tokens: TokenDirectory) -> Self {
        self.tokens = tokens;
        self
    }

    pub fn build(self) -> SdkResult<TestHarness> {
        let mut market_reader = InMemoryMarketReader::new().with_market(self.market_chain_id, self.snapshot);
        if self.market_loading {
            market_reader = market_reader.always_loading();
        }

        let mut allowance_reader = InMemoryAllowanceReader::new(self.allowances);
        if self.allowances_loading {
            allowance_reader = allowance_reader.always_loading();
        }
        let allowances = Arc::new(allowance_reader);
        let clock = Arc::new(FixedClock::new(NOW));

        let mut quote_resolver = InMemoryQuoteResolver::new(default_quotes());
        if self.quotes_loading {
            quote_resolver = quote_resolver.always_loading();
        }

        let context = MarketActionContext::new(
            Arc::new(market_reader),
            Arc::new(quote_resolver),
            allowances.clone(),
            Arc::new(test_registry()?),
        )
        .with_clock(clock.clone())
        .with_tokens(self.tokens);

        Ok(TestHarness {
            context: Arc::new(context),
            allowances,
            clock,
        })
    }
}
