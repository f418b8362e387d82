use alloy_primitives::Address;
use itertools::Itertools;

use crate::utils::lower_hex;

/// One page of the allowlisted pools at `block`, with the first page of
/// holders inlined.
pub fn pools_query(first: usize, skip: usize, block: u64, pool_ids: &[Address]) -> String {
    let ids = pool_ids
        .iter()
        .map(|id| format!("\"{}\"", lower_hex(id)))
        .join(", ");

    format!(
        r#"{{
    pools (first: {first}, skip: {skip}, block: {{ number: {block} }}, where: {{ id_in: [{ids}] }}) {{
        id
        publicSwap
        swapFee
        controller
        createTime
        tokensList
        totalShares
        shares (first: {first}) {{
            userAddress {{
                id
            }}
        }}
    }}
}}"#
    )
}

/// One page of a single pool's holders at `block`.
pub fn pool_shares_query(pool: &Address, first: usize, skip: usize, block: u64) -> String {
    format!(
        r#"{{
    pools (where: {{ id: "{pool}" }}, block: {{ number: {block} }}) {{
        shares (first: {first}, skip: {skip}) {{
            userAddress {{
                id
            }}
        }}
    }}
}}"#,
        pool = lower_hex(pool)
    )
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn pools_query_carries_pagination_and_filter() {
        let ids = [
            Address::from_str("0x2CF9106FAF2C5C8713035D40DF655FB1B9B0F9B9").unwrap(),
            Address::from_str("0x00000000000000000000000000000000000000aa").unwrap(),
        ];
        let query = pools_query(1000, 2000, 10606940, &ids);

        assert!(query.contains("pools (first: 1000, skip: 2000, block: { number: 10606940 }"));
        assert!(query.contains(
            r#"id_in: ["0x2cf9106faf2c5c8713035d40df655fb1b9b0f9b9", "0x00000000000000000000000000000000000000aa"]"#
        ));
        assert!(query.contains("shares (first: 1000)"));
        assert!(query.contains("totalShares"));
    }

    #[test]
    fn shares_query_targets_one_pool() {
        let pool = Address::from_str("0x2cf9106faf2c5c8713035d40df655fb1b9b0f9b9").unwrap();
        let query = pool_shares_query(&pool, 1000, 1000, 42);

        assert!(query.contains(r#"where: { id: "0x2cf9106faf2c5c8713035d40df655fb1b9b0f9b9" }"#));
        assert!(query.contains("block: { number: 42 }"));
        assert!(query.contains("shares (first: 1000, skip: 1000)"));
    }
}
