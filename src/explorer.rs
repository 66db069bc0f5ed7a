//! Explorer links for signatures and addresses.

use anchor_client::Cluster;
use solana_sdk::{pubkey::Pubkey, signature::Signature};

const EXPLORER_URL: &str = "https://explorer.solana.com";

pub fn transaction_url(signature: &Signature, cluster: &Cluster) -> String {
    format!("{}/tx/{}{}", EXPLORER_URL, signature, cluster_query(cluster))
}

pub fn address_url(address: &Pubkey, cluster: &Cluster) -> String {
    format!("{}/address/{}{}", EXPLORER_URL, address, cluster_query(cluster))
}

fn cluster_query(cluster: &Cluster) -> String {
    match cluster {
        Cluster::Mainnet => String::new(),
        Cluster::Devnet => "?cluster=devnet".to_string(),
        Cluster::Testnet => "?cluster=testnet".to_string(),
        other => {
            let encoded: String = url::form_urlencoded::byte_serialize(other.url().as_bytes()).collect();
            format!("?cluster=custom&customUrl={}", encoded)
        }
    }
}
