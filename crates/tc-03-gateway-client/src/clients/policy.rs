//! Policy service: the holder's own life, car and house policies.

use crate::domain::GatewayError;
use crate::http::GatewayHttp;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared_types::policy::{
    AnyInsurancePolicy, CarInsurancePolicy, HouseInsurancePolicy, LifeInsurancePolicy, PolicyKind,
};

/// A policy record served under `/policies/{kind}`.
pub trait PolicyRecord: Serialize + DeserializeOwned + Send + Sync + 'static {
    const KIND: PolicyKind;

    fn into_any(self) -> AnyInsurancePolicy;
}

impl PolicyRecord for LifeInsurancePolicy {
    const KIND: PolicyKind = PolicyKind::Life;

    fn into_any(self) -> AnyInsurancePolicy {
        AnyInsurancePolicy::Life(self)
    }
}

impl PolicyRecord for CarInsurancePolicy {
    const KIND: PolicyKind = PolicyKind::Car;

    fn into_any(self) -> AnyInsurancePolicy {
        AnyInsurancePolicy::Car(self)
    }
}

impl PolicyRecord for HouseInsurancePolicy {
    const KIND: PolicyKind = PolicyKind::House;

    fn into_any(self) -> AnyInsurancePolicy {
        AnyInsurancePolicy::House(self)
    }
}

pub(crate) fn collection_path(kind: PolicyKind) -> String {
    format!("/policies/{}", kind.path_segment())
}

#[derive(Clone)]
pub struct PolicyClient {
    http: GatewayHttp,
}

impl PolicyClient {
    pub fn new(http: GatewayHttp) -> Self {
        Self { http }
    }

    pub async fn create<P: PolicyRecord>(&self, policy: &P) -> Result<P, GatewayError> {
        self.http
            .send_json(Method::POST, &collection_path(P::KIND), policy)
            .await
    }

    pub async fn update<P: PolicyRecord>(&self, id: i64, policy: &P) -> Result<P, GatewayError> {
        let path = format!("{}/{id}", collection_path(P::KIND));
        self.http.send_json(Method::PUT, &path, policy).await
    }

    pub async fn get<P: PolicyRecord>(&self, id: i64) -> Result<P, GatewayError> {
        let path = format!("{}/{id}", collection_path(P::KIND));
        self.http.get_json(&path).await
    }

    pub async fn list_mine<P: PolicyRecord>(&self) -> Result<Vec<P>, GatewayError> {
        let path = format!("{}/me", collection_path(P::KIND));
        self.http.get_json(&path).await
    }

    /// The holder's policies of one kind, erased to `AnyInsurancePolicy`.
    pub async fn list_mine_of(&self, kind: PolicyKind) -> Result<Vec<AnyInsurancePolicy>, GatewayError> {
        fn erase<P: PolicyRecord>(items: Vec<P>) -> Vec<AnyInsurancePolicy> {
            items.into_iter().map(PolicyRecord::into_any).collect()
        }

        Ok(match kind {
            PolicyKind::Life => erase(self.list_mine::<LifeInsurancePolicy>().await?),
            PolicyKind::Car => erase(self.list_mine::<CarInsurancePolicy>().await?),
            PolicyKind::House => erase(self.list_mine::<HouseInsurancePolicy>().await?),
        })
    }
}
