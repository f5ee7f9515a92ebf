use std::boxed::Box;
use std::collections::HashSet;

use super::{WorkflowEntity, WorkflowUcError};
use crate::adapter::repository::AbstractOrderRepo;
use crate::api::dto::OrderSummaryDto;
use crate::auth::AppAuthedClaim;

pub struct OrderQueryUseCase {
    pub repo_order: Box<dyn AbstractOrderRepo>,
    pub auth_claim: AppAuthedClaim,
}

impl OrderQueryUseCase {
    pub async fn fetch_one(&self, oid: &str) -> Result<OrderSummaryDto, WorkflowUcError> {
        let m = self
            .repo_order
            .fetch(oid)
            .await?
            .ok_or_else(|| WorkflowUcError::NotFound {
                entity: WorkflowEntity::Order,
                id: oid.to_string(),
            })?;
        if m.authorize(&self.auth_claim).is_party() {
            Ok(OrderSummaryDto::from(&m))
        } else {
            Err(WorkflowUcError::Unauthorized {
                entity: WorkflowEntity::Order,
                id: oid.to_string(),
            })
        }
    }

    /// Orders where the caller is either the buyer or the seller, oldest
    /// first.
    pub async fn list(&self) -> Result<Vec<OrderSummaryDto>, WorkflowUcError> {
        let usr_id = self.auth_claim.profile.as_str();
        let mut orders = self.repo_order.fetch_by_buyer(usr_id).await?;
        let bought = orders
            .iter()
            .map(|m| m.id().to_string())
            .collect::<HashSet<_>>();
        let sold = self.repo_order.fetch_by_seller(usr_id).await?;
        orders.extend(sold.into_iter().filter(|m| !bought.contains(m.id())));
        orders.sort_by(|a, b| {
            a.create_time()
                .cmp(&b.create_time())
                .then_with(|| a.id().cmp(b.id()))
        });
        Ok(orders.iter().map(OrderSummaryDto::from).collect())
    }
}
