mod in_mem;

use std::boxed::Box;
use std::fmt::Display;
use std::result::Result;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{AppError, AppErrorCode};
use crate::model::{
    BankAccountModelError, BankAccountSetModel, BankAccountUpdateArgs, BuyerReportModel,
    ListingModel, ListingModelError, ListingUpdateArgs, OrderModel, OrderModelError,
    OrderUpdateArgs, RatingModelError, SellerVerificationModel, ShopModel, ShopRatingModel,
    VerificationModelError, VerificationUpdateArgs,
};

use self::in_mem::{
    BankAccountInMemRepo, BuyerReportInMemRepo, ListingInMemRepo, OrderInMemRepo,
    SellerVerifyInMemRepo, ShopInMemRepo,
};
use super::datastore::AppDataStoreContext;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppRepoErrorFnLabel {
    InitRepo,
    CreateOrder,
    FetchOrder,
    FetchOrdersByParty,
    UpdateOrder,
    CreateShop,
    FetchShop,
    UpdateShopRating,
    CreateListing,
    FetchListing,
    FetchBankTransferListings,
    UpdateListing,
    FetchBankAccounts,
    UpdateBankAccounts,
    FetchVerification,
    UpdateVerification,
    CreateBuyerReport,
    FetchBuyerReports,
}

#[derive(Debug)]
pub enum AppRepoErrorDetail {
    DataStore(AppError),
    // document does not match the model layout
    Codec(String),
    // rejection raised by the model inside an atomic read-modify-write
    Order(OrderModelError),
    Rating(RatingModelError),
    Listing(ListingModelError),
    BankAccount(BankAccountModelError),
    Verification(VerificationModelError),
}

#[derive(Debug)]
pub struct AppRepoError {
    pub fn_label: AppRepoErrorFnLabel,
    pub code: AppErrorCode,
    pub detail: AppRepoErrorDetail,
}

pub type AppOrderRepoUpdateFn =
    fn(&mut OrderModel, OrderUpdateArgs) -> Result<(), OrderModelError>;
pub type AppShopRepoRatingFn = fn(&mut ShopRatingModel, u8) -> Result<(), RatingModelError>;
pub type AppListingRepoUpdateFn =
    fn(&mut ListingModel, ListingUpdateArgs) -> Result<(), ListingModelError>;
pub type AppBankAccountRepoUpdateFn =
    fn(&mut BankAccountSetModel, BankAccountUpdateArgs) -> Result<(), BankAccountModelError>;
pub type AppVerifyRepoUpdateFn =
    fn(&mut SellerVerificationModel, VerificationUpdateArgs) -> Result<(), VerificationModelError>;

// the repository instance may be used across an await, the future created
// by callers has to be able to move between threads
#[async_trait]
pub trait AbstractOrderRepo: Sync + Send {
    async fn create(&self, orders: Vec<OrderModel>) -> Result<(), AppRepoError>;

    async fn fetch(&self, oid: &str) -> Result<Option<OrderModel>, AppRepoError>;

    async fn fetch_by_buyer(&self, usr_id: &str) -> Result<Vec<OrderModel>, AppRepoError>;

    async fn fetch_by_seller(&self, usr_id: &str) -> Result<Vec<OrderModel>, AppRepoError>;

    async fn fetch_by_custom_order(
        &self,
        custom_oid: &str,
    ) -> Result<Vec<OrderModel>, AppRepoError>;

    /// Atomic read-modify-write on a single order, `Ok(None)` means the
    /// order does not exist. Rejection from the callback leaves the stored
    /// order unchanged.
    async fn update(
        &self,
        oid: &str,
        args: OrderUpdateArgs,
        cb: AppOrderRepoUpdateFn,
    ) -> Result<Option<OrderModel>, AppRepoError>;
}

#[async_trait]
pub trait AbstractShopRepo: Sync + Send {
    async fn create(&self, shop: ShopModel) -> Result<(), AppRepoError>;

    async fn fetch(&self, shop_id: &str) -> Result<Option<ShopModel>, AppRepoError>;

    async fn update_rating(
        &self,
        shop_id: &str,
        sample: u8,
        cb: AppShopRepoRatingFn,
    ) -> Result<Option<ShopRatingModel>, AppRepoError>;
}

#[async_trait]
pub trait AbstractListingRepo: Sync + Send {
    async fn create(&self, listings: Vec<ListingModel>) -> Result<(), AppRepoError>;

    async fn fetch(&self, listing_id: &str) -> Result<Option<ListingModel>, AppRepoError>;

    // active listings of the seller with bank transfer enabled
    async fn fetch_bank_transfer_active(
        &self,
        seller_id: &str,
    ) -> Result<Vec<ListingModel>, AppRepoError>;

    async fn update(
        &self,
        listing_id: &str,
        args: ListingUpdateArgs,
        cb: AppListingRepoUpdateFn,
    ) -> Result<Option<ListingModel>, AppRepoError>;
}

#[async_trait]
pub trait AbstractBankAccountRepo: Sync + Send {
    // seller without any account gets an empty set
    async fn fetch(&self, owner_id: &str) -> Result<BankAccountSetModel, AppRepoError>;

    async fn update(
        &self,
        owner_id: &str,
        args: BankAccountUpdateArgs,
        cb: AppBankAccountRepoUpdateFn,
    ) -> Result<BankAccountSetModel, AppRepoError>;
}

#[async_trait]
pub trait AbstractSellerVerifyRepo: Sync + Send {
    async fn fetch(&self, usr_id: &str) -> Result<Option<SellerVerificationModel>, AppRepoError>;

    // record absent in the store is treated as `NO_DATA`
    async fn update(
        &self,
        usr_id: &str,
        args: VerificationUpdateArgs,
        cb: AppVerifyRepoUpdateFn,
    ) -> Result<SellerVerificationModel, AppRepoError>;
}

#[async_trait]
pub trait AbstractBuyerReportRepo: Sync + Send {
    async fn create(&self, report: BuyerReportModel) -> Result<(), AppRepoError>;

    async fn fetch_by_order_seller(
        &self,
        oid: &str,
        seller_id: &str,
    ) -> Result<Vec<BuyerReportModel>, AppRepoError>;
}

impl Display for AppRepoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "repo, fn:{:?}, code:{:?}, detail:{:?}",
            self.fn_label, self.code, self.detail
        )
    }
}

pub async fn app_repo_order(
    dstore: Arc<AppDataStoreContext>,
) -> Result<Box<dyn AbstractOrderRepo>, AppRepoError> {
    let repo = OrderInMemRepo::new(dstore).await?;
    Ok(Box::new(repo))
}

pub async fn app_repo_shop(
    dstore: Arc<AppDataStoreContext>,
) -> Result<Box<dyn AbstractShopRepo>, AppRepoError> {
    let repo = ShopInMemRepo::new(dstore).await?;
    Ok(Box::new(repo))
}

pub async fn app_repo_listing(
    dstore: Arc<AppDataStoreContext>,
) -> Result<Box<dyn AbstractListingRepo>, AppRepoError> {
    let repo = ListingInMemRepo::new(dstore).await?;
    Ok(Box::new(repo))
}

pub async fn app_repo_bank_account(
    dstore: Arc<AppDataStoreContext>,
) -> Result<Box<dyn AbstractBankAccountRepo>, AppRepoError> {
    let repo = BankAccountInMemRepo::new(dstore).await?;
    Ok(Box::new(repo))
}

pub async fn app_repo_seller_verify(
    dstore: Arc<AppDataStoreContext>,
) -> Result<Box<dyn AbstractSellerVerifyRepo>, AppRepoError> {
    let repo = SellerVerifyInMemRepo::new(dstore).await?;
    Ok(Box::new(repo))
}

pub async fn app_repo_buyer_report(
    dstore: Arc<AppDataStoreContext>,
) -> Result<Box<dyn AbstractBuyerReportRepo>, AppRepoError> {
    let repo = BuyerReportInMemRepo::new(dstore).await?;
    Ok(Box::new(repo))
}
