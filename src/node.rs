use std::time::Duration;

use alloy_provider::{Provider, ProviderBuilder, RootProvider};
use alloy_rpc_client::RpcClient;
use alloy_rpc_types::BlockNumberOrTag;
use alloy_transport_http::Http;
use tracing::debug;
use url::Url;

use crate::errors::FetchError;

/// Block metadata the period run needs from a node.
#[async_trait::async_trait]
pub trait BlockSource: Send + Sync {
    /// Unix timestamp of `block`.
    async fn block_timestamp(&self, block: u64) -> Result<u64, FetchError>;

    /// Current chain head.
    async fn latest_block(&self) -> Result<u64, FetchError>;
}

/// Ethereum node reached over HTTP JSON-RPC.
#[derive(Clone)]
pub struct NodeClient {
    provider: RootProvider<Http<reqwest::Client>>,
}

impl NodeClient {
    pub fn new(url: Url, timeout: Duration) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| FetchError::Http {
                url: url.to_string(),
                source,
            })?;

        let client = RpcClient::new(Http::with_client(http, url), false);
        let provider = ProviderBuilder::new().on_client(client);

        Ok(Self { provider })
    }
}

#[async_trait::async_trait]
impl BlockSource for NodeClient {
    async fn block_timestamp(&self, block: u64) -> Result<u64, FetchError> {
        let header = self
            .provider
            .get_block_by_number(BlockNumberOrTag::Number(block), false)
            .await?
            .ok_or(FetchError::MissingField("block"))?
            .header;

        debug!(target: "lp_rewards::node", "block {block} mined at {}", header.timestamp);
        Ok(header.timestamp)
    }

    async fn latest_block(&self) -> Result<u64, FetchError> {
        Ok(self.provider.get_block_number().await?)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use serde_json::{json, Value};
    use wiremock::{Request, Respond, ResponseTemplate};

    /// Answers a JSON-RPC call, echoing the request id.
    pub(crate) struct RpcReply(pub Value);

    impl Respond for RpcReply {
        fn respond(&self, request: &Request) -> ResponseTemplate {
            let body: Value = serde_json::from_slice(&request.body).unwrap();
            let mut reply = json!({ "jsonrpc": "2.0", "id": body["id"] });
            match self.0.get("error") {
                Some(error) => reply["error"] = error.clone(),
                None => reply["result"] = self.0["result"].clone(),
            }
            ResponseTemplate::new(200).set_body_json(reply)
        }
    }

    pub(crate) fn block(number: &str, timestamp: &str) -> Value {
        json!({
            "hash": "0x8e38b4dbf6b11fcc3b9dee84fb7986e29ca0a02cecd8977c161ff7333329681e",
            "parentHash": "0x1e77d8f1267348b516ebc4f4da1e2aa59f85f0cbd853949500ffac8bfc38ba14",
            "sha3Uncles": "0x1dcc4de8dec75d7aab85b567b6ccd41ad312451b948a7413f0a142fd40d49347",
            "miner": "0x5a0b54d5dc17e0aadc383d2db43b0a0d3e029c4c",
            "stateRoot": "0x76ab0b899e8387436ff2658e2988f83cbf1af1590b9fe9feca3714f8d1824940",
            "transactionsRoot": "0x56e81f171bcc55a6ff8345e692c0f86e5b48e01b996cadc001622fb5e363b421",
            "receiptsRoot": "0x56e81f171bcc55a6ff8345e692c0f86e5b48e01b996cadc001622fb5e363b421",
            "logsBloom": format!("0x{}", "0".repeat(512)),
            "difficulty": "0x8b8d3f7e3a1c1",
            "totalDifficulty": "0x3f5a6a3f3a1c1",
            "number": number,
            "gasLimit": "0xbe5c8b",
            "gasUsed": "0x0",
            "timestamp": timestamp,
            "extraData": "0x",
            "mixHash": "0x0000000000000000000000000000000000000000000000000000000000000000",
            "nonce": "0x0000000000000000",
            "size": "0x21c",
            "uncles": [],
            "transactions": []
        })
    }
}
