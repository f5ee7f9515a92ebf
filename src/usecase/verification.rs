use std::boxed::Box;
use std::sync::Arc;

use chrono::Utc;

use super::WorkflowUcError;
use crate::adapter::repository::AbstractSellerVerifyRepo;
use crate::adapter::storage::AbstractObjectStorage;
use crate::api::dto::{VerificationStatusDto, VerificationSubmitReqDto, VerifyDocumentReqDto};
use crate::auth::AppAuthedClaim;
use crate::constant::hard_limit;
use crate::logging::{app_log_event, AppLogContext, AppLogLevel};
use crate::model::{
    FieldErrorReason, FieldValidationError, SellerVerificationModel, VerificationSubmitArgs,
    VerificationUpdateArgs, VerifyDocumentLabel,
};

pub struct SellerVerificationUseCase {
    pub repo_verify: Box<dyn AbstractSellerVerifyRepo>,
    pub obj_storage: Arc<Box<dyn AbstractObjectStorage>>,
    pub auth_claim: AppAuthedClaim,
    pub logctx: Arc<AppLogContext>,
}

impl SellerVerificationUseCase {
    pub async fn status(&self) -> Result<VerificationStatusDto, WorkflowUcError> {
        let usr_id = self.auth_claim.profile.as_str();
        let saved = self
            .repo_verify
            .fetch(usr_id)
            .await?
            .unwrap_or_else(|| SellerVerificationModel::new(usr_id));
        Ok(VerificationStatusDto::from(&saved))
    }

    /// Moves the verification of the caller to `PENDING`. Document blobs
    /// are written to object storage only after the submission is known
    /// to be complete.
    pub async fn submit(
        &self,
        req: VerificationSubmitReqDto,
    ) -> Result<VerificationStatusDto, WorkflowUcError> {
        let usr_id = self.auth_claim.profile.as_str();
        if let Some(saved) = self.repo_verify.fetch(usr_id).await? {
            saved.can_submit()?;
        }
        let VerificationSubmitReqDto {
            full_name,
            address,
            id_front,
            id_back,
            selfie,
        } = req;
        let docs = [
            (VerifyDocumentLabel::IdFront, id_front),
            (VerifyDocumentLabel::IdBack, id_back),
            (VerifyDocumentLabel::Selfie, selfie),
        ];
        let presence = docs
            .iter()
            .map(|(label, d)| (*label, d.as_ref().is_some_and(|v| v.is_present())))
            .collect::<Vec<_>>();
        SellerVerificationModel::check_complete(&full_name, &address, &presence)?;
        Self::validate_blobs(&docs)?;

        let mut urls = Vec::with_capacity(docs.len());
        for (label, doc) in docs {
            let url = match doc {
                Some(d) => self.resolve_document(usr_id, label, d).await?,
                None => String::new(), // unreachable after the completeness check
            };
            urls.push(url);
        }
        let mut urls = urls.into_iter();
        let args = VerificationSubmitArgs {
            full_name,
            address,
            id_front_url: urls.next().unwrap_or_default(),
            id_back_url: urls.next().unwrap_or_default(),
            selfie_url: urls.next().unwrap_or_default(),
            time: Utc::now(),
        };
        let logctx = &self.logctx;
        let saved = self
            .repo_verify
            .update(
                usr_id,
                VerificationUpdateArgs::Submit(args),
                SellerVerificationModel::update,
            )
            .await
            .map_err(|e| {
                app_log_event!(logctx, AppLogLevel::DEBUG, "usr:{usr_id}, {e}");
                WorkflowUcError::from(e)
            })?;
        app_log_event!(
            logctx,
            AppLogLevel::INFO,
            "usr:{usr_id}, status:{}",
            saved.status.label()
        );
        Ok(VerificationStatusDto::from(&saved))
    } // end of fn submit

    fn validate_blobs(
        docs: &[(VerifyDocumentLabel, Option<VerifyDocumentReqDto>)],
    ) -> Result<(), WorkflowUcError> {
        let errors = docs
            .iter()
            .filter_map(|(label, d)| match d {
                Some(VerifyDocumentReqDto::Blob { content_type, data }) => {
                    if data.len() > hard_limit::MAX_VERIFY_DOC_NBYTES {
                        let reason = FieldErrorReason::TooLong(hard_limit::MAX_VERIFY_DOC_NBYTES);
                        Some(FieldValidationError::new(label.label(), reason))
                    } else if content_type.trim().is_empty() {
                        let reason = FieldErrorReason::InvalidFormat;
                        Some(FieldValidationError::new(label.label(), reason))
                    } else {
                        None
                    }
                }
                _others => None,
            })
            .collect::<Vec<_>>();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(WorkflowUcError::Validation(errors))
        }
    }

    async fn resolve_document(
        &self,
        usr_id: &str,
        label: VerifyDocumentLabel,
        doc: VerifyDocumentReqDto,
    ) -> Result<String, WorkflowUcError> {
        match doc {
            VerifyDocumentReqDto::Uploaded { url } => Ok(url.trim().to_string()),
            VerifyDocumentReqDto::Blob { content_type, data } => {
                let path = format!("verification/{}/{}", usr_id, label.label());
                self.obj_storage
                    .put(path.as_str(), content_type.as_str(), data)
                    .await
                    .map_err(|e| {
                        let logctx = &self.logctx;
                        app_log_event!(logctx, AppLogLevel::ERROR, "usr:{usr_id}, {e}");
                        WorkflowUcError::ObjectStorage(e)
                    })
            }
        }
    }
} // end of impl SellerVerificationUseCase
