use std::boxed::Box;
use std::sync::Arc;

use chrono::Utc;

use super::{WorkflowEntity, WorkflowUcError};
use crate::adapter::repository::{AbstractListingRepo, AbstractOrderRepo, AbstractShopRepo};
use crate::api::dto::{OrderSummaryDto, ReviewReqDto, ShopRatingDto};
use crate::auth::AppAuthedClaim;
use crate::logging::{app_log_event, AppLogContext, AppLogLevel};
use crate::model::{
    ListingModel, ListingReviewModel, ListingUpdateArgs, OrderModel, OrderTransitionReq,
    OrderUpdateArgs, ShopRatingModel,
};

pub struct SubmitReviewUseCase {
    pub repo_order: Box<dyn AbstractOrderRepo>,
    pub repo_listing: Box<dyn AbstractListingRepo>,
    pub repo_shop: Box<dyn AbstractShopRepo>,
    pub auth_claim: AppAuthedClaim,
    pub logctx: Arc<AppLogContext>,
}

#[derive(Debug)]
pub struct SubmitReviewResult {
    pub order: OrderSummaryDto,
    // absent when the rating aggregation was skipped or failed
    pub shop_rating: Option<ShopRatingDto>,
}

impl SubmitReviewUseCase {
    pub async fn execute(
        self,
        oid: &str,
        req: ReviewReqDto,
    ) -> Result<SubmitReviewResult, WorkflowUcError> {
        let args = OrderUpdateArgs {
            actor: self.auth_claim.clone(),
            req: OrderTransitionReq::SubmitReview {
                rating: req.rating,
                text: req.text,
            },
            time: Utc::now(),
        };
        // the review is set at most once, this update is the only place
        // that decides whether the side effects below run
        let m = self
            .repo_order
            .update(oid, args, OrderModel::apply)
            .await?
            .ok_or_else(|| WorkflowUcError::NotFound {
                entity: WorkflowEntity::Order,
                id: oid.to_string(),
            })?;
        let logctx = &self.logctx;
        app_log_event!(logctx, AppLogLevel::INFO, "oid:{oid}, review-saved");
        self.append_to_listing(&m).await;
        let shop_rating = self.aggregate_rating(&m).await;
        Ok(SubmitReviewResult {
            order: OrderSummaryDto::from(&m),
            shop_rating: shop_rating.as_ref().map(ShopRatingDto::from),
        })
    } // end of fn execute

    async fn append_to_listing(&self, m: &OrderModel) {
        let logctx = &self.logctx;
        let Some(review) = m.review() else {
            return;
        };
        let item = ListingReviewModel {
            order_id: m.id().to_string(),
            buyer_id: m.buyer_id().to_string(),
            rating: review.rating,
            text: review.text.clone(),
            create_time: review.create_time,
        };
        let args = ListingUpdateArgs::AppendReview(item);
        match self
            .repo_listing
            .update(m.item_id(), args, ListingModel::update)
            .await
        {
            Ok(Some(_)) => {}
            Ok(None) => {
                app_log_event!(
                    logctx,
                    AppLogLevel::WARNING,
                    "listing-missing, oid:{}, item:{}",
                    m.id(),
                    m.item_id()
                );
            }
            Err(e) => {
                app_log_event!(logctx, AppLogLevel::ERROR, "oid:{}, {e}", m.id());
            }
        }
    }

    async fn aggregate_rating(&self, m: &OrderModel) -> Option<ShopRatingModel> {
        let logctx = &self.logctx;
        let sample = m.review()?.rating;
        let result = self
            .repo_shop
            .update_rating(m.shop_id(), sample, ShopRatingModel::aggregate)
            .await;
        match result {
            Ok(Some(v)) => {
                app_log_event!(
                    logctx,
                    AppLogLevel::DEBUG,
                    "shop:{}, count:{}, avg:{}",
                    m.shop_id(),
                    v.count,
                    v.avg
                );
                Some(v)
            }
            Ok(None) => {
                app_log_event!(logctx, AppLogLevel::WARNING, "shop-missing:{}", m.shop_id());
                None
            }
            Err(e) => {
                app_log_event!(logctx, AppLogLevel::ERROR, "shop:{}, {e}", m.shop_id());
                None
            }
        }
    }
} // end of impl SubmitReviewUseCase
