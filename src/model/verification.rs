use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{FieldErrorReason, FieldValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SellerVerifyStatus {
    NoData,
    Pending,
    Completed,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyDocumentLabel {
    IdFront,
    IdBack,
    Selfie,
}

#[derive(Debug, Clone, PartialEq)]
pub enum VerificationModelError {
    InvalidTransition {
        usr_id: String,
        curr: SellerVerifyStatus,
    },
    Validation(Vec<FieldValidationError>),
}

pub struct VerificationSubmitArgs {
    pub full_name: String,
    pub address: String,
    pub id_front_url: String,
    pub id_back_url: String,
    pub selfie_url: String,
    pub time: DateTime<Utc>,
}

pub enum VerificationUpdateArgs {
    Submit(VerificationSubmitArgs),
    Resolve { approved: bool, time: DateTime<Utc> },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SellerVerificationModel {
    pub usr_id: String,
    pub status: SellerVerifyStatus,
    pub full_name: String,
    pub address: String,
    pub id_front_url: String,
    pub id_back_url: String,
    pub selfie_url: String,
    pub submit_time: Option<DateTime<Utc>>,
    pub resolve_time: Option<DateTime<Utc>>,
}

impl SellerVerifyStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::NoData => "NO_DATA",
            Self::Pending => "PENDING",
            Self::Completed => "COMPLETED",
            Self::Rejected => "REJECTED",
        }
    }
}

impl VerifyDocumentLabel {
    pub fn all() -> [Self; 3] {
        [Self::IdFront, Self::IdBack, Self::Selfie]
    }
    pub fn label(&self) -> &'static str {
        match self {
            Self::IdFront => "id_front",
            Self::IdBack => "id_back",
            Self::Selfie => "selfie",
        }
    }
}

impl SellerVerificationModel {
    pub fn new(usr_id: &str) -> Self {
        Self {
            usr_id: usr_id.to_string(),
            status: SellerVerifyStatus::NoData,
            full_name: String::new(),
            address: String::new(),
            id_front_url: String::new(),
            id_back_url: String::new(),
            selfie_url: String::new(),
            submit_time: None,
            resolve_time: None,
        }
    }

    /// Reports every missing piece of a submission at once, `docs` tells
    /// whether each document is supplied in whatever form.
    pub fn check_complete(
        full_name: &str,
        address: &str,
        docs: &[(VerifyDocumentLabel, bool)],
    ) -> Result<(), VerificationModelError> {
        let mut missing = [("full_name", full_name), ("address", address)]
            .into_iter()
            .filter(|(_, v)| v.trim().is_empty())
            .map(|(label, _)| FieldValidationError::new(label, FieldErrorReason::Empty))
            .collect::<Vec<_>>();
        VerifyDocumentLabel::all()
            .into_iter()
            .filter(|label| !docs.iter().any(|(l, present)| l == label && *present))
            .for_each(|label| {
                let e = FieldValidationError::new(label.label(), FieldErrorReason::Empty);
                missing.push(e);
            });
        if missing.is_empty() {
            Ok(())
        } else {
            Err(VerificationModelError::Validation(missing))
        }
    }

    pub fn update(&mut self, args: VerificationUpdateArgs) -> Result<(), VerificationModelError> {
        match args {
            VerificationUpdateArgs::Submit(a) => self.submit(a),
            VerificationUpdateArgs::Resolve { approved, time } => self.resolve(approved, time),
        }
    }

    pub fn can_submit(&self) -> Result<(), VerificationModelError> {
        match self.status {
            SellerVerifyStatus::NoData | SellerVerifyStatus::Rejected => Ok(()),
            SellerVerifyStatus::Pending | SellerVerifyStatus::Completed => {
                Err(VerificationModelError::InvalidTransition {
                    usr_id: self.usr_id.clone(),
                    curr: self.status,
                })
            }
        }
    }

    pub fn submit(&mut self, args: VerificationSubmitArgs) -> Result<(), VerificationModelError> {
        self.can_submit()?;
        let docs = [
            (VerifyDocumentLabel::IdFront, &args.id_front_url),
            (VerifyDocumentLabel::IdBack, &args.id_back_url),
            (VerifyDocumentLabel::Selfie, &args.selfie_url),
        ]
        .map(|(label, url)| (label, !url.trim().is_empty()));
        Self::check_complete(&args.full_name, &args.address, &docs)?;
        self.full_name = args.full_name.trim().to_string();
        self.address = args.address.trim().to_string();
        self.id_front_url = args.id_front_url;
        self.id_back_url = args.id_back_url;
        self.selfie_url = args.selfie_url;
        self.submit_time = Some(args.time);
        self.resolve_time = None;
        self.status = SellerVerifyStatus::Pending;
        Ok(())
    }

    /// Decision of the external reviewing process on a pending submission
    pub fn resolve(
        &mut self,
        approved: bool,
        time: DateTime<Utc>,
    ) -> Result<(), VerificationModelError> {
        if self.status != SellerVerifyStatus::Pending {
            return Err(VerificationModelError::InvalidTransition {
                usr_id: self.usr_id.clone(),
                curr: self.status,
            });
        }
        self.status = if approved {
            SellerVerifyStatus::Completed
        } else {
            SellerVerifyStatus::Rejected
        };
        self.resolve_time = Some(time);
        Ok(())
    }

    pub fn bank_transfer_eligible(&self, eligible: &[SellerVerifyStatus]) -> bool {
        eligible.contains(&self.status)
    }
} // end of impl SellerVerificationModel
