use std::boxed::Box;
use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;

use super::listing::seller_bank_transfer_eligible;
use super::{WorkflowEntity, WorkflowUcError};
use crate::adapter::repository::{AbstractListingRepo, AbstractOrderRepo, AbstractSellerVerifyRepo};
use crate::api::dto::{OrderCreateReqDto, OrderCreateRespDto, OrderLineReqDto, OrderSummaryDto};
use crate::auth::AppAuthedClaim;
use crate::constant::{app_meta, hard_limit};
use crate::generate_id_string;
use crate::logging::{app_log_event, AppLogContext, AppLogLevel};
use crate::model::{
    FieldErrorReason, FieldValidationError, ListingModel, OrderCreateArgs, OrderModel,
    PaymentMethod, SellerVerifyStatus,
};

/// Checkout boundary, turns the lines of a buyer request into orders. Price,
/// shipping cost and parties are taken from the stored listings, never from
/// the request.
pub struct CreateOrderUseCase {
    pub repo_order: Box<dyn AbstractOrderRepo>,
    pub repo_listing: Box<dyn AbstractListingRepo>,
    pub repo_verify: Box<dyn AbstractSellerVerifyRepo>,
    pub eligible_status: Vec<SellerVerifyStatus>,
    pub auth_claim: AppAuthedClaim,
    pub logctx: Arc<AppLogContext>,
}

impl CreateOrderUseCase {
    pub async fn execute(
        &self,
        req: OrderCreateReqDto,
    ) -> Result<OrderCreateRespDto, WorkflowUcError> {
        let OrderCreateReqDto { pay_method, lines } = req;
        Self::validate_lines(&lines)?;
        let mut listings = Vec::with_capacity(lines.len());
        for line in lines.iter() {
            let item = self.load_listing(line.listing_id.as_str()).await?;
            listings.push(item);
        }
        if let Some(l) = listings
            .iter()
            .find(|l| self.auth_claim.same_user(l.seller_id.as_str()))
        {
            let logctx = &self.logctx;
            app_log_event!(logctx, AppLogLevel::DEBUG, "self-purchase, listing:{}", l.id);
            let e = FieldValidationError::new("listing_id", FieldErrorReason::OwnListing);
            return Err(WorkflowUcError::Validation(vec![e]));
        }
        if pay_method == PaymentMethod::BankTransfer {
            self.check_bank_transfer(&listings).await?;
        }

        let custom_order_id = if lines.len() > 1 {
            Some(generate_id_string(app_meta::MACHINE_CODE))
        } else {
            None
        };
        // the buyer email grants access to the order, it never comes from the request
        let buyer_email = self.auth_claim.email.clone();
        let time = Utc::now();
        let orders = lines
            .into_iter()
            .zip(listings)
            .map(|(line, listing)| {
                let args = OrderCreateArgs {
                    buyer_id: self.auth_claim.profile.clone(),
                    buyer_email: buyer_email.clone(),
                    seller_id: listing.seller_id,
                    shop_id: listing.shop_id,
                    item_id: listing.id,
                    item_name: listing.title,
                    unit_price: listing.unit_price,
                    quantity: line.quantity,
                    shipping_cost: listing.shipping_cost,
                    pay_method,
                    custom_order_id: custom_order_id.clone(),
                    time,
                };
                OrderModel::try_new(generate_id_string(app_meta::MACHINE_CODE), args)
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.repo_order.create(orders.clone()).await?;
        let logctx = &self.logctx;
        app_log_event!(
            logctx,
            AppLogLevel::INFO,
            "usr:{}, num-orders:{}, custom-oid:{:?}",
            self.auth_claim.profile,
            orders.len(),
            custom_order_id
        );
        Ok(OrderCreateRespDto {
            custom_order_id,
            orders: orders.iter().map(OrderSummaryDto::from).collect(),
        })
    } // end of fn execute

    fn validate_lines(lines: &[OrderLineReqDto]) -> Result<(), WorkflowUcError> {
        let limit = hard_limit::MAX_LINES_PER_CUSTOM_ORDER;
        let reason = if lines.is_empty() {
            Some(FieldErrorReason::Empty)
        } else if lines.len() > limit {
            Some(FieldErrorReason::TooLong(limit))
        } else {
            None
        };
        let mut errors = reason
            .map(|r| vec![FieldValidationError::new("lines", r)])
            .unwrap_or_default();
        let max_qty = hard_limit::MAX_QUANTITY_PER_LINE;
        if lines.iter().any(|l| l.quantity == 0 || l.quantity > max_qty) {
            let reason = FieldErrorReason::OutOfRange(1, max_qty as i64);
            errors.push(FieldValidationError::new("quantity", reason));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(WorkflowUcError::Validation(errors))
        }
    }

    async fn load_listing(&self, listing_id: &str) -> Result<ListingModel, WorkflowUcError> {
        self.repo_listing
            .fetch(listing_id)
            .await?
            .filter(|l| l.active)
            .ok_or_else(|| WorkflowUcError::NotFound {
                entity: WorkflowEntity::Listing,
                id: listing_id.to_string(),
            })
    }

    async fn check_bank_transfer(&self, listings: &[ListingModel]) -> Result<(), WorkflowUcError> {
        let mut eligible_sellers: HashMap<&str, bool> = HashMap::new();
        for listing in listings {
            let seller_id = listing.seller_id.as_str();
            let eligible = match eligible_sellers.get(seller_id) {
                Some(v) => *v,
                None => {
                    let v = seller_bank_transfer_eligible(
                        self.repo_verify.as_ref(),
                        seller_id,
                        &self.eligible_status,
                    )
                    .await?;
                    eligible_sellers.insert(seller_id, v);
                    v
                }
            };
            if !(eligible && listing.offers_bank_transfer()) {
                let logctx = &self.logctx;
                app_log_event!(
                    logctx,
                    AppLogLevel::DEBUG,
                    "listing:{}, seller-eligible:{eligible}, bank-transfer-disabled",
                    listing.id
                );
                let e = FieldValidationError::new("pay_method", FieldErrorReason::NotEligible);
                return Err(WorkflowUcError::Validation(vec![e]));
            }
        }
        Ok(())
    } // end of fn check_bank_transfer
} // end of impl CreateOrderUseCase
