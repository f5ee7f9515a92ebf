use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{FieldErrorReason, FieldValidationError};
use crate::constant::{hard_limit, REGEX_BANK_ACCOUNT_NUMBER};

#[derive(Debug, Clone, PartialEq)]
pub enum BankAccountModelError {
    NotFound(String),
    LimitExceeded(usize),
    Validation(Vec<FieldValidationError>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankAccountModel {
    pub id: String,
    pub bank_name: String,
    pub branch: Option<String>,
    pub account_number: String,
    pub holder_name: String,
    pub is_default: bool,
    pub create_time: DateTime<Utc>,
}

pub struct BankAccountFields {
    pub bank_name: String,
    pub branch: Option<String>,
    pub account_number: String,
    pub holder_name: String,
}

pub enum BankAccountUpdateArgs {
    Add(String, BankAccountFields, DateTime<Utc>),
    Edit(String, BankAccountFields),
    Remove(String),
    SetDefault(String),
}

// all payout accounts of a seller are kept in one document, each change to
// the set is a single-document write
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankAccountSetModel {
    pub owner_id: String,
    pub accounts: Vec<BankAccountModel>,
}

impl BankAccountFields {
    fn validate(self) -> Result<Self, BankAccountModelError> {
        let mut errors = [
            ("bank_name", self.bank_name.as_str()),
            ("full_name", self.holder_name.as_str()),
        ]
        .into_iter()
        .filter_map(|(label, v)| FieldValidationError::check_text(label, v, Some(128)))
        .collect::<Vec<_>>();
        let acc_num = self.account_number.trim();
        if acc_num.is_empty() {
            errors.push(FieldValidationError::new(
                "account_number",
                FieldErrorReason::Empty,
            ));
        } else {
            let matched = Regex::new(REGEX_BANK_ACCOUNT_NUMBER)
                .map(|re| re.is_match(acc_num))
                .unwrap_or(false);
            if !matched {
                errors.push(FieldValidationError::new(
                    "account_number",
                    FieldErrorReason::InvalidFormat,
                ));
            }
        }
        if errors.is_empty() {
            let branch = self
                .branch
                .map(|b| b.trim().to_string())
                .filter(|b| !b.is_empty());
            Ok(Self {
                bank_name: self.bank_name.trim().to_string(),
                holder_name: self.holder_name.trim().to_string(),
                account_number: acc_num.to_string(),
                branch,
            })
        } else {
            Err(BankAccountModelError::Validation(errors))
        }
    } // end of fn validate
} // end of impl BankAccountFields

impl BankAccountSetModel {
    pub fn new(owner_id: &str) -> Self {
        Self {
            owner_id: owner_id.to_string(),
            accounts: Vec::new(),
        }
    }

    pub fn default_account(&self) -> Option<&BankAccountModel> {
        self.accounts.iter().find(|a| a.is_default)
    }

    pub fn find(&self, id: &str) -> Option<&BankAccountModel> {
        self.accounts.iter().find(|a| a.id == id)
    }

    pub fn update(&mut self, args: BankAccountUpdateArgs) -> Result<(), BankAccountModelError> {
        match args {
            BankAccountUpdateArgs::Add(id, fields, time) => self.add(id, fields, time),
            BankAccountUpdateArgs::Edit(id, fields) => self.edit(id.as_str(), fields),
            BankAccountUpdateArgs::Remove(id) => self.remove(id.as_str()),
            BankAccountUpdateArgs::SetDefault(id) => self.set_default(id.as_str()),
        }
    }

    fn add(
        &mut self,
        id: String,
        fields: BankAccountFields,
        time: DateTime<Utc>,
    ) -> Result<(), BankAccountModelError> {
        let limit = hard_limit::MAX_BANK_ACCOUNTS_PER_SELLER;
        if self.accounts.len() >= limit {
            return Err(BankAccountModelError::LimitExceeded(limit));
        }
        let f = fields.validate()?;
        let item = BankAccountModel {
            id,
            bank_name: f.bank_name,
            branch: f.branch,
            account_number: f.account_number,
            holder_name: f.holder_name,
            is_default: self.accounts.is_empty(),
            create_time: time,
        };
        self.accounts.push(item);
        Ok(())
    }

    fn edit(&mut self, id: &str, fields: BankAccountFields) -> Result<(), BankAccountModelError> {
        let f = fields.validate()?;
        let item = self
            .accounts
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(BankAccountModelError::NotFound(id.to_string()))?;
        item.bank_name = f.bank_name;
        item.branch = f.branch;
        item.account_number = f.account_number;
        item.holder_name = f.holder_name;
        Ok(())
    }

    fn remove(&mut self, id: &str) -> Result<(), BankAccountModelError> {
        let idx = self
            .accounts
            .iter()
            .position(|a| a.id == id)
            .ok_or(BankAccountModelError::NotFound(id.to_string()))?;
        let removed = self.accounts.remove(idx);
        if removed.is_default {
            // promote the earliest remaining account
            if let Some(first) = self.accounts.first_mut() {
                first.is_default = true;
            }
        }
        Ok(())
    }

    fn set_default(&mut self, id: &str) -> Result<(), BankAccountModelError> {
        if self.find(id).is_none() {
            return Err(BankAccountModelError::NotFound(id.to_string()));
        }
        self.accounts
            .iter_mut()
            .for_each(|a| a.is_default = a.id == id);
        Ok(())
    }
} // end of impl BankAccountSetModel
