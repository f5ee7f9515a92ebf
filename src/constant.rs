pub mod app_meta {
    pub const MACHINE_CODE: u8 = 1;
    // TODO, machine code to UUID generator should be configurable
}

pub mod env_vars {
    pub const SYS_BASEPATH: &str = "SYS_BASE_PATH";
    pub const SERVICE_BASEPATH: &str = "SERVICE_BASE_PATH";
    // relative path starting from app / service home folder
    pub const CFG_FILEPATH: &str = "CONFIG_FILE_PATH";
}

pub mod hard_limit {
    pub const MAX_ITEMS_STORED_PER_MODEL: u32 = 2200u32;
    pub const MAX_LINES_PER_CUSTOM_ORDER: usize = 50;
    pub const MAX_QUANTITY_PER_LINE: u32 = 9999;
    pub const MAX_BANK_ACCOUNTS_PER_SELLER: usize = 10;
    // number of offending listings reported when a bank account is still in use,
    // the rest is summarized as a count
    pub const MAX_BLOCKING_LISTINGS_SHOWN: usize = 3;
    pub const MIN_COMPLAINT_CHARS: usize = 10;
    pub const MAX_COMPLAINT_CHARS: usize = 2000;
    pub const MAX_REVIEW_TEXT_CHARS: usize = 2000;
    pub const MIN_RATING: u8 = 1;
    pub const MAX_RATING: u8 = 5;
    pub const MAX_PAYMENT_SLIP_NBYTES: usize = 5 * 1024 * 1024;
    pub const MAX_VERIFY_DOC_NBYTES: usize = 8 * 1024 * 1024;
}

// account number printed on a bank book, digits optionally separated
// by space or hyphen, IBAN-length at most
pub const REGEX_BANK_ACCOUNT_NUMBER: &str = r"^[0-9][0-9 \-]{2,32}[0-9]$";

pub mod logging {
    use serde::Deserialize;

    #[allow(clippy::upper_case_acronyms)]
    #[derive(Deserialize)]
    pub enum Level {
        TRACE,
        DEBUG,
        INFO,
        WARNING,
        ERROR,
        FATAL,
    }

    #[allow(clippy::upper_case_acronyms)]
    #[derive(Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum Destination {
        CONSOLE,
        LOCALFS,
    } // TODO, Fluentd
}
