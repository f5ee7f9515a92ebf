use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::model::{
    BankAccountFields, BankAccountModel, BuyerReportModel, BuyerReportStatus, ListingModel,
    OrderModel, OrderStatus, PaymentMethod, ReviewModel, SellerVerificationModel,
    SellerVerifyStatus, ShopRatingModel,
};

fn fmt_money(value: Decimal) -> String {
    let v = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}", v)
}

fn fmt_time(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[derive(Deserialize)]
pub struct PaymentSlipUploadReqDto {
    pub content_type: String,
    pub data: Vec<u8>,
}

#[derive(Deserialize)]
pub struct ReviewReqDto {
    pub rating: u8,
    #[serde(default)]
    pub text: String,
}

#[derive(Serialize, Debug)]
pub struct ReviewRespDto {
    pub rating: u8,
    pub text: String,
    pub create_time: String,
}

#[derive(Serialize, Debug)]
pub struct OrderSummaryDto {
    pub id: String,
    pub buyer_id: String,
    pub seller_id: String,
    pub shop_id: String,
    pub item_id: String,
    pub item_name: String,
    pub unit_price: String,
    pub quantity: u32,
    pub shipping_cost: String,
    pub total: String,
    pub pay_method: PaymentMethod,
    pub status: OrderStatus,
    pub payment_slip_url: Option<String>,
    pub payment_slip_uploaded_at: Option<String>,
    pub review: Option<ReviewRespDto>,
    pub custom_order_id: Option<String>,
    pub create_time: String,
}

#[derive(Serialize, Debug, PartialEq)]
pub struct ShopRatingDto {
    pub count: u32,
    pub rating: String,
}

#[derive(Deserialize)]
pub struct OrderLineReqDto {
    pub listing_id: String,
    pub quantity: u32,
}

#[derive(Deserialize)]
pub struct OrderCreateReqDto {
    pub pay_method: PaymentMethod,
    pub lines: Vec<OrderLineReqDto>,
}

#[derive(Serialize, Debug)]
pub struct OrderCreateRespDto {
    pub custom_order_id: Option<String>,
    pub orders: Vec<OrderSummaryDto>,
}

#[derive(Deserialize)]
pub struct ListingPaymentReqDto {
    pub bank_transfer: bool,
}

#[derive(Serialize, Debug)]
pub struct ListingPaymentRespDto {
    pub id: String,
    pub bank_transfer: bool,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct BlockingListingDto {
    pub id: String,
    pub title: String,
}

#[derive(Deserialize)]
pub struct BankAccountReqDto {
    pub bank_name: String,
    pub branch: Option<String>,
    pub account_number: String,
    pub full_name: String,
}

#[derive(Serialize, Debug)]
pub struct BankAccountDto {
    pub id: String,
    pub bank_name: String,
    pub branch: Option<String>,
    pub account_number: String,
    pub full_name: String,
    pub is_default: bool,
    pub create_time: String,
}

#[derive(Deserialize)]
#[serde(tag = "source")]
pub enum VerifyDocumentReqDto {
    // the image has been saved to object storage by the client
    Uploaded { url: String },
    Blob { content_type: String, data: Vec<u8> },
}

#[derive(Deserialize)]
pub struct VerificationSubmitReqDto {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub address: String,
    pub id_front: Option<VerifyDocumentReqDto>,
    pub id_back: Option<VerifyDocumentReqDto>,
    pub selfie: Option<VerifyDocumentReqDto>,
}

#[derive(Serialize, Debug)]
pub struct VerificationStatusDto {
    pub status: SellerVerifyStatus,
    pub submit_time: Option<String>,
    pub resolve_time: Option<String>,
}

#[derive(Deserialize)]
pub struct BuyerReportReqDto {
    pub order_id: String,
    pub complaint: String,
}

#[derive(Serialize, Debug)]
pub struct BuyerReportDto {
    pub id: String,
    pub order_id: String,
    pub seller_id: String,
    pub buyer_id: String,
    pub complaint: String,
    pub status: BuyerReportStatus,
    pub create_time: String,
}

#[derive(Serialize, Debug, PartialEq)]
pub struct ErrorRespDto {
    pub kind: String,
    pub message: String,
}

impl From<&ReviewModel> for ReviewRespDto {
    fn from(value: &ReviewModel) -> Self {
        Self {
            rating: value.rating,
            text: value.text.clone(),
            create_time: fmt_time(value.create_time),
        }
    }
}

impl From<&OrderModel> for OrderSummaryDto {
    fn from(value: &OrderModel) -> Self {
        let slip = value.payment_slip();
        Self {
            id: value.id().to_string(),
            buyer_id: value.buyer_id().to_string(),
            seller_id: value.seller_id().to_string(),
            shop_id: value.shop_id().to_string(),
            item_id: value.item_id().to_string(),
            item_name: value.item_name().to_string(),
            unit_price: fmt_money(value.unit_price()),
            quantity: value.quantity(),
            shipping_cost: fmt_money(value.shipping_cost()),
            total: fmt_money(value.total()),
            pay_method: value.pay_method(),
            status: value.status(),
            payment_slip_url: slip.map(|s| s.url.clone()),
            payment_slip_uploaded_at: slip.map(|s| fmt_time(s.uploaded_at)),
            review: value.review().map(ReviewRespDto::from),
            custom_order_id: value.custom_order_id().map(String::from),
            create_time: fmt_time(value.create_time()),
        }
    }
}

impl From<&ShopRatingModel> for ShopRatingDto {
    fn from(value: &ShopRatingModel) -> Self {
        Self {
            count: value.count,
            rating: fmt_money(value.avg),
        }
    }
}

impl From<&ListingModel> for BlockingListingDto {
    fn from(value: &ListingModel) -> Self {
        Self {
            id: value.id.clone(),
            title: value.title.clone(),
        }
    }
}

impl From<&ListingModel> for ListingPaymentRespDto {
    fn from(value: &ListingModel) -> Self {
        Self {
            id: value.id.clone(),
            bank_transfer: value.bank_transfer,
        }
    }
}

impl From<BankAccountReqDto> for BankAccountFields {
    fn from(value: BankAccountReqDto) -> Self {
        Self {
            bank_name: value.bank_name,
            branch: value.branch,
            account_number: value.account_number,
            holder_name: value.full_name,
        }
    }
}

impl From<&BankAccountModel> for BankAccountDto {
    fn from(value: &BankAccountModel) -> Self {
        Self {
            id: value.id.clone(),
            bank_name: value.bank_name.clone(),
            branch: value.branch.clone(),
            account_number: value.account_number.clone(),
            full_name: value.holder_name.clone(),
            is_default: value.is_default,
            create_time: fmt_time(value.create_time),
        }
    }
}

impl From<&SellerVerificationModel> for VerificationStatusDto {
    fn from(value: &SellerVerificationModel) -> Self {
        Self {
            status: value.status,
            submit_time: value.submit_time.map(fmt_time),
            resolve_time: value.resolve_time.map(fmt_time),
        }
    }
}

impl From<&BuyerReportModel> for BuyerReportDto {
    fn from(value: &BuyerReportModel) -> Self {
        Self {
            id: value.id.clone(),
            order_id: value.order_id.clone(),
            seller_id: value.seller_id.clone(),
            buyer_id: value.buyer_id.clone(),
            complaint: value.complaint.clone(),
            status: value.status,
            create_time: fmt_time(value.create_time),
        }
    }
}

impl VerifyDocumentReqDto {
    // whether the client actually supplied something for the document
    pub fn is_present(&self) -> bool {
        match self {
            Self::Uploaded { url } => !url.trim().is_empty(),
            Self::Blob {
                content_type: _,
                data,
            } => !data.is_empty(),
        }
    }
}
