use alloy_primitives::Address;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    errors::FetchError,
    utils::{serde_address, serde_address_vec, serde_decimal_str, serde_shares, TokenAmount},
};

/// A pool at a historical block, with every share holder resolved.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Pool {
    #[serde(with = "serde_address")]
    pub id: Address,
    pub public_swap: bool,
    #[serde(with = "serde_decimal_str")]
    pub swap_fee: Decimal,
    #[serde(with = "serde_address")]
    pub controller: Address,
    pub create_time: u64,
    #[serde(with = "serde_address_vec")]
    pub tokens_list: Vec<Address>,
    #[serde(with = "serde_shares")]
    pub total_shares: TokenAmount,
    #[serde(with = "serde_address_vec")]
    pub share_holders: Vec<Address>,
}

impl Pool {
    pub fn from_raw(raw: RawPool, share_holders: Vec<Address>) -> Self {
        Self {
            id: raw.id,
            public_swap: raw.public_swap,
            swap_fee: raw.swap_fee,
            controller: raw.controller,
            create_time: raw.create_time,
            tokens_list: raw.tokens_list,
            total_shares: raw.total_shares,
            share_holders,
        }
    }
}

/// A pool as returned by the subgraph, holders limited to the inline page.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawPool {
    #[serde(with = "serde_address")]
    pub id: Address,
    pub public_swap: bool,
    #[serde(with = "serde_decimal_str")]
    pub swap_fee: Decimal,
    #[serde(with = "serde_address")]
    pub controller: Address,
    pub create_time: u64,
    #[serde(with = "serde_address_vec")]
    pub tokens_list: Vec<Address>,
    #[serde(with = "serde_shares")]
    pub total_shares: TokenAmount,
    #[serde(default)]
    pub shares: Vec<RawShare>,
}

impl RawPool {
    pub fn inline_holders(&self) -> Vec<Address> {
        self.shares.iter().map(RawShare::holder).collect()
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RawShare {
    pub user_address: UserRef,
}

impl RawShare {
    pub fn new(holder: Address) -> Self {
        Self {
            user_address: UserRef { id: holder },
        }
    }

    pub fn holder(&self) -> Address {
        self.user_address.id
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct UserRef {
    #[serde(with = "serde_address")]
    pub id: Address,
}

#[derive(Debug, Serialize)]
pub(crate) struct GraphRequest<'a> {
    pub query: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GraphResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Option<Vec<GraphError>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GraphError {
    pub message: String,
}

impl<T> GraphResponse<T> {
    pub fn into_data(self) -> Result<T, FetchError> {
        match self.errors {
            Some(errors) if !errors.is_empty() => Err(FetchError::GraphQl(
                errors.into_iter().map(|e| e.message).collect(),
            )),
            _ => self.data.ok_or(FetchError::MissingField("data")),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct PoolsData {
    pub pools: Vec<RawPool>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PoolSharesData {
    pub pools: Vec<PoolShares>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PoolShares {
    pub shares: Vec<RawShare>,
}
