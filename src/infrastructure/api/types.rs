//! Wire DTOs for the backend indexer API

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::models::{Collection, CollectionRef, Farm, Nft, TransferEvent};

#[derive(Debug, Deserialize)]
pub struct FarmDto {
    pub id: String,
    pub name: String,
    pub wallet: String,
    pub receiving_address: String,
    pub leftover_address: String,
    pub maintenance_address: String,
    pub monthly_maintenance_fee: Decimal,
}

impl From<FarmDto> for Farm {
    fn from(dto: FarmDto) -> Self {
        Farm {
            id: dto.id,
            name: dto.name,
            wallet: dto.wallet,
            receiving_address: dto.receiving_address,
            leftover_address: dto.leftover_address,
            maintenance_address: dto.maintenance_address,
            monthly_maintenance_fee: dto.monthly_maintenance_fee,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CollectionRefDto {
    pub denom_id: String,
}

impl From<CollectionRefDto> for CollectionRef {
    fn from(dto: CollectionRefDto) -> Self {
        CollectionRef {
            denom_id: dto.denom_id,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct VerificationDto {
    pub verified: bool,
}

#[derive(Debug, Deserialize)]
pub struct NftDto {
    pub id: String,
    pub hash_rate: f64,
    pub expires_at: DateTime<Utc>,
    pub minted_at: DateTime<Utc>,
    pub owner: String,
}

#[derive(Debug, Deserialize)]
pub struct CollectionDto {
    pub denom_id: String,
    pub nfts: Vec<NftDto>,
}

impl From<CollectionDto> for Collection {
    fn from(dto: CollectionDto) -> Self {
        Collection {
            denom_id: dto.denom_id,
            nfts: dto
                .nfts
                .into_iter()
                .map(|n| Nft {
                    id: n.id,
                    hash_rate: n.hash_rate,
                    expires_at: n.expires_at,
                    minted_at: n.minted_at,
                    owner: n.owner,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TransferDto {
    pub from: String,
    pub to: String,
    pub timestamp: DateTime<Utc>,
}

impl From<TransferDto> for TransferEvent {
    fn from(dto: TransferDto) -> Self {
        TransferEvent {
            from: dto.from,
            to: dto.to,
            timestamp: dto.timestamp,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PayoutAddressDto {
    pub address: String,
}

#[derive(Debug, Deserialize)]
pub struct HashPowerDto {
    pub hash_power: f64,
}
