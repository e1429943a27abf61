/// Token identifiers, quotes and the supported-token directory

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt, str::FromStr};

use crate::constants::UNKNOWN_SYMBOL;

// ============================================================================
// Address Validation
// ============================================================================

/// Check that `value` is a well-formed account address
///
/// Accepts `0x` followed by 40 hex digits. All-lowercase and all-uppercase
/// digits are accepted as-is; mixed case must carry a valid EIP-55 checksum.
pub fn is_valid_address(value: &str) -> bool {
    let Some(hex) = value.strip_prefix("0x") else {
        return false;
    };
    if hex.len() != 40 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return false;
    }

    let has_lower = hex.bytes().any(|b| b.is_ascii_lowercase());
    let has_upper = hex.bytes().any(|b| b.is_ascii_uppercase());
    if has_lower && has_upper {
        return Address::parse_checksummed(value, None).is_ok();
    }
    true
}

/// Parse a well-formed account address
pub fn parse_address(value: &str) -> Option<Address> {
    if !is_valid_address(value) {
        return None;
    }
    Address::from_str(value).ok()
}

// ============================================================================
// Token Identifier
// ============================================================================

/// Token identifier in `"<kind>-<address>"` form
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenId(String);

impl TokenId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Build an id from a kind prefix and an address
    pub fn from_parts(kind: &str, address: &Address) -> Self {
        Self(format!("{}-{}", kind, address))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Text before the first `-`
    pub fn kind(&self) -> &str {
        self.0.split_once('-').map(|(kind, _)| kind).unwrap_or(&self.0)
    }

    /// Text after the first `-`, if any
    pub fn address_part(&self) -> Option<&str> {
        self.0.split_once('-').map(|(_, address)| address)
    }

    /// Parsed address portion, if well-formed
    pub fn address(&self) -> Option<Address> {
        self.address_part().and_then(parse_address)
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TokenId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for TokenId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

// ============================================================================
// Token Metadata and Quotes
// ============================================================================

/// Static metadata for a supported token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub id: TokenId,
    pub symbol: String,
    pub decimals: u8,
    #[serde(default)]
    pub name: Option<String>,
}

/// Token metadata with a unit price in USD
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenQuote {
    pub token_id: TokenId,
    pub symbol: String,
    pub decimals: u8,
    /// Unit price in USD
    pub price: f64,
}

impl TokenQuote {
    /// Quote used when the resolver has nothing for a token
    pub fn fallback(token_id: &TokenId, metadata: Option<&TokenMetadata>) -> Self {
        match metadata {
            Some(meta) => Self {
                token_id: token_id.clone(),
                symbol: meta.symbol.clone(),
                decimals: meta.decimals,
                price: 0.0,
            },
            None => Self {
                token_id: token_id.clone(),
                symbol: UNKNOWN_SYMBOL.to_string(),
                decimals: 18,
                price: 0.0,
            },
        }
    }
}

/// Caller-supplied override for a token the quote source may not know
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomTokenDataElement {
    pub token_id: TokenId,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub decimals: Option<u8>,
    #[serde(default)]
    pub price: Option<f64>,
}

pub type CustomTokenData = Vec<CustomTokenDataElement>;

/// Apply custom overrides on top of a resolved quote
pub fn apply_custom_token_data(mut quote: TokenQuote, custom: &[CustomTokenDataElement]) -> TokenQuote {
    if let Some(entry) = custom.iter().find(|entry| entry.token_id == quote.token_id) {
        if let Some(symbol) = &entry.symbol {
            quote.symbol = symbol.clone();
        }
        if let Some(decimals) = entry.decimals {
            quote.decimals = decimals;
        }
        if let Some(price) = entry.price {
            quote.price = price;
        }
    }
    quote
}

// ============================================================================
// Token Directory
// ============================================================================

/// Directory of supported tokens keyed by id
#[derive(Debug, Clone, Default)]
pub struct TokenDirectory {
    tokens: HashMap<TokenId, TokenMetadata>,
}

impl TokenDirectory {
    pub fn new(tokens: impl IntoIterator<Item = TokenMetadata>) -> Self {
        Self {
            tokens: tokens.into_iter().map(|meta| (meta.id.clone(), meta)).collect(),
        }
    }

    pub fn get(&self, token_id: &TokenId) -> Option<&TokenMetadata> {
        self.tokens.get(token_id)
    }

    /// Upper-cased symbol for labels
    pub fn label_symbol(&self, token_id: &TokenId) -> String {
        self.get(token_id)
            .map(|meta| meta.symbol.to_uppercase())
            .unwrap_or_else(|| UNKNOWN_SYMBOL.to_string())
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOWER: &str = "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";

    #[test]
    fn test_address_validation() {
        assert!(is_valid_address(LOWER));
        assert!(is_valid_address("0xAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA"));
        // EIP-55 reference vector
        assert!(is_valid_address("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"));

        assert!(!is_valid_address("0x5aaeb6053F3E94C9b9A09f33669435E7Ef1BeAed"));
        assert!(!is_valid_address("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa"));
        assert!(!is_valid_address("0xAAA"));
        assert!(!is_valid_address("0xgggggggggggggggggggggggggggggggggggggggg"));
        assert!(!is_valid_address(""));
    }

    #[test]
    fn test_token_id_parts() {
        let id = TokenId::new(format!("1-{}", LOWER));
        assert_eq!(id.kind(), "1");
        assert_eq!(id.address_part(), Some(LOWER));
        assert_eq!(id.address(), parse_address(LOWER));

        let no_separator = TokenId::new("plain");
        assert_eq!(no_separator.address_part(), None);
        assert_eq!(no_separator.address(), None);

        // Everything after the first separator is the address portion
        let extra = TokenId::new(format!("1-{}-x", LOWER));
        assert_eq!(extra.address(), None);
    }

    #[test]
    fn test_custom_token_data_overrides() {
        let id = TokenId::new(format!("1-{}", LOWER));
        let quote = TokenQuote::fallback(&id, None);
        assert_eq!(quote.symbol, "UNKNOWN");
        assert_eq!(quote.decimals, 18);

        let custom = vec![CustomTokenDataElement {
            token_id: id.clone(),
            symbol: Some("pts".to_string()),
            decimals: Some(6),
            price: None,
        }];
        let quote = apply_custom_token_data(quote, &custom);
        assert_eq!(quote.symbol, "pts");
        assert_eq!(quote.decimals, 6);
        assert_eq!(quote.price, 0.0);
    }

    #[test]
    fn test_directory_label_symbol() {
        let id = TokenId::new(format!("1-{}", LOWER));
        let directory = TokenDirectory::new(vec![TokenMetadata {
            id: id.clone(),
            symbol: "weth".to_string(),
            decimals: 18,
            name: None,
        }]);
        assert_eq!(directory.label_symbol(&id), "WETH");
        assert_eq!(directory.label_symbol(&TokenId::new("1-0x00")), "UNKNOWN");
    }
}
