use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::config::AppConfig;
use crate::domain::contracts::{FarmDataSource, PayoutAddressResolver};
use crate::domain::errors::PayoutError;
use crate::domain::models::{Collection, CollectionRef, Farm, TransferEvent};
use crate::infrastructure::api::error::ApiClientError;
use crate::infrastructure::api::types::{
    CollectionDto, CollectionRefDto, FarmDto, HashPowerDto, PayoutAddressDto, TransferDto,
    VerificationDto,
};

/// Client for the backend indexer that owns farm, collection, NFT and
/// transfer data
pub struct BackendApiClient {
    client: Client,
    api_url: String,
}

impl BackendApiClient {
    /// Create a new API client
    pub fn new(config: &AppConfig) -> Result<Self, ApiClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| {
                ApiClientError::ResponseError(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(BackendApiClient {
            client,
            api_url: config.api.url.clone(),
        })
    }

    /// GET a JSON resource; any non-success status is an error — the engine
    /// aborts a pass on collaborator failure rather than guessing
    async fn get_json<T: DeserializeOwned>(
        &self,
        path_and_query: &str,
    ) -> Result<T, ApiClientError> {
        let url = format!("{}{}", self.api_url, path_and_query);
        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(ApiClientError::ApiError(format!(
                "{} returned status {}",
                url, status
            )));
        }

        response.json::<T>().await.map_err(|e| {
            ApiClientError::ResponseError(format!("Error decoding response from {}: {}", url, e))
        })
    }
}

#[async_trait]
impl PayoutAddressResolver for BackendApiClient {
    async fn payout_address_for(
        &self,
        chain_address: &str,
        network: &str,
        token_id: &str,
        denom_id: &str,
    ) -> Result<String, PayoutError> {
        let dto: PayoutAddressDto = self
            .get_json(&format!(
                "/payout-address?address={}&network={}&token={}&denom={}",
                chain_address, network, token_id, denom_id
            ))
            .await?;
        Ok(dto.address)
    }
}

#[async_trait]
impl FarmDataSource for BackendApiClient {
    async fn list_approved_farms(&self) -> Result<Vec<Farm>, PayoutError> {
        let farms: Vec<FarmDto> = self.get_json("/farms?status=approved").await?;
        Ok(farms.into_iter().map(Farm::from).collect())
    }

    async fn collections_for_farm(
        &self,
        farm_id: &str,
    ) -> Result<Vec<CollectionRef>, PayoutError> {
        let refs: Vec<CollectionRefDto> = self
            .get_json(&format!("/farms/{}/collections", farm_id))
            .await?;
        Ok(refs.into_iter().map(CollectionRef::from).collect())
    }

    async fn verify_collection(&self, denom_id: &str) -> Result<bool, PayoutError> {
        let dto: VerificationDto = self
            .get_json(&format!("/collections/{}/verified", denom_id))
            .await?;
        Ok(dto.verified)
    }

    async fn collections_with_nfts(
        &self,
        denom_ids: &[String],
    ) -> Result<Vec<Collection>, PayoutError> {
        if denom_ids.is_empty() {
            return Ok(Vec::new());
        }
        let collections: Vec<CollectionDto> = self
            .get_json(&format!(
                "/collections/with-nfts?denoms={}",
                denom_ids.join(",")
            ))
            .await?;
        Ok(collections.into_iter().map(Collection::from).collect())
    }

    async fn transfer_history(
        &self,
        denom_id: &str,
        nft_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<TransferEvent>, PayoutError> {
        let transfers: Vec<TransferDto> = self
            .get_json(&format!(
                "/collections/{}/nfts/{}/transfers?since={}",
                denom_id,
                nft_id,
                since.timestamp()
            ))
            .await?;
        Ok(transfers.into_iter().map(TransferEvent::from).collect())
    }

    async fn pool_hash_power_today(
        &self,
        farm_name: &str,
        since: NaiveDate,
    ) -> Result<f64, PayoutError> {
        let dto: HashPowerDto = self
            .get_json(&format!(
                "/farms/{}/hash-power?since={}",
                farm_name, since
            ))
            .await?;
        Ok(dto.hash_power)
    }
}
