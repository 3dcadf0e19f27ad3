use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// A single network (chain) an asset can be withdrawn over, per spec §4.6 `getAssetsInfo`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AssetNetworkInfo {
    pub asset: SmolStr,
    pub network: SmolStr,
    pub withdraw_fee: Decimal,
    pub min_withdraw: Decimal,
    pub withdraw_enabled: bool,
    pub deposit_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct WithdrawalRequest {
    pub asset: SmolStr,
    pub network: SmolStr,
    pub address: String,
    pub amount: Decimal,
    pub memo: Option<String>,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Deserialize, Serialize)]
pub enum WithdrawalStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct WithdrawalResponse {
    pub withdrawal_id: String,
    pub asset: SmolStr,
    pub amount: Decimal,
    pub status: WithdrawalStatus,
    pub timestamp: DateTime<Utc>,
}

/// Venue-assigned deposit address for an asset/network pair (spec §4.6 "deposit address").
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DepositAddress {
    pub asset: SmolStr,
    pub network: SmolStr,
    pub address: String,
    pub memo: Option<String>,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Deserialize, Serialize)]
pub enum DepositStatus {
    Pending,
    Confirming,
    Completed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DepositRecord {
    pub tx_id: String,
    pub asset: SmolStr,
    pub network: SmolStr,
    pub amount: Decimal,
    pub status: DepositStatus,
    pub timestamp: DateTime<Utc>,
}
