use txtrail_infra::net::{normalize_node_base, shard_transaction_url};

#[test]
fn base_without_trailing_slash_gains_one() {
    let base = normalize_node_base("https://node.example.com/chain").unwrap();
    assert_eq!(base.as_str(), "https://node.example.com/chain/");
}

#[test]
fn base_with_trailing_slash_is_unchanged() {
    let base = normalize_node_base("https://node.example.com/chain/").unwrap();
    assert_eq!(base.as_str(), "https://node.example.com/chain/");
}

#[test]
fn invalid_base_is_rejected() {
    assert!(normalize_node_base("not a url").is_err());
}

#[test]
fn shard_path_appends_to_the_base_path() {
    let base = normalize_node_base("https://node.example.com/chain").unwrap();
    let url = shard_transaction_url(&base, "Shard1", "tx_A").unwrap();
    assert_eq!(
        url.as_str(),
        "https://node.example.com/chain/shards/Shard1/transactions/tx_A"
    );
}

#[test]
fn bare_host_base_works_too() {
    let base = normalize_node_base("http://127.0.0.1:8080").unwrap();
    let url = shard_transaction_url(&base, "Shard0", "tx_A").unwrap();
    assert_eq!(
        url.as_str(),
        "http://127.0.0.1:8080/shards/Shard0/transactions/tx_A"
    );
}

#[test]
fn reserved_characters_in_identifiers_are_escaped() {
    let base = normalize_node_base("https://node.example.com").unwrap();
    let url = shard_transaction_url(&base, "Shard0", "tx A/b").unwrap();
    assert_eq!(
        url.as_str(),
        "https://node.example.com/shards/Shard0/transactions/tx%20A%2Fb"
    );
}
