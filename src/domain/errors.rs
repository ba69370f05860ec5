//! Management API error catalog.
//!
//! Every error this gateway produces on its own (as opposed to errors relayed
//! from a remote envelope) is one of the codes below, serialized as a
//! [`ResponseErrorMessage`].

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Structured error carried by remote envelopes and returned to API clients.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ResponseErrorMessage {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub code: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub details: String,
}

/// Static catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorCode {
    pub code: &'static str,
    pub message: &'static str,
}

impl ErrorCode {
    const fn new(code: &'static str, message: &'static str) -> Self {
        Self { code, message }
    }

    pub fn with_details(&self, details: impl Into<String>) -> ResponseErrorMessage {
        ResponseErrorMessage {
            code: self.code.to_string(),
            message: self.message.to_string(),
            details: details.into(),
        }
    }
}

impl From<&ErrorCode> for ResponseErrorMessage {
    fn from(code: &ErrorCode) -> Self {
        code.with_details(String::new())
    }
}

impl From<ErrorCode> for ResponseErrorMessage {
    fn from(code: ErrorCode) -> Self {
        Self::from(&code)
    }
}

pub const INTERNAL_ERROR_TEMPLATE: &str = "internal error";

pub const UNKNOWN: ErrorCode = ErrorCode::new("ma000001", "unknown error. try request later");
pub const VALIDATION_FAILED: ErrorCode = ErrorCode::new("ma000002", "validation failed");
pub const INTERNAL: ErrorCode = ErrorCode::new("ma000003", INTERNAL_ERROR_TEMPLATE);
pub const ACCESS_DENIED: ErrorCode = ErrorCode::new("ma000004", "access denied");
pub const ID_IS_EMPTY: ErrorCode = ErrorCode::new("ma000005", "identifier can't be empty");
pub const INCORRECT_MERCHANT_ID: ErrorCode =
    ErrorCode::new("ma000006", "incorrect merchant identifier");
pub const INCORRECT_NOTIFICATION_ID: ErrorCode =
    ErrorCode::new("ma000007", "incorrect notification identifier");
pub const INCORRECT_ORDER_ID: ErrorCode = ErrorCode::new("ma000008", "incorrect order identifier");
pub const INCORRECT_PRODUCT_ID: ErrorCode =
    ErrorCode::new("ma000009", "incorrect product identifier");
pub const INCORRECT_COUNTRY_IDENTIFIER: ErrorCode =
    ErrorCode::new("ma000010", "incorrect country identifier");
pub const INCORRECT_CURRENCY_IDENTIFIER: ErrorCode =
    ErrorCode::new("ma000011", "incorrect currency identifier");
pub const ORDERS_NOT_FOUND: ErrorCode = ErrorCode::new("ma000012", "orders not found");
pub const COUNTRY_NOT_FOUND: ErrorCode = ErrorCode::new("ma000013", "country not found");
pub const CURRENCY_NOT_FOUND: ErrorCode = ErrorCode::new("ma000014", "currency not found");
pub const NOTIFICATION_NOT_FOUND: ErrorCode = ErrorCode::new("ma000015", "notification not found");
pub const AGREEMENT_CAN_NOT_BE_GENERATED: ErrorCode = ErrorCode::new(
    "ma000020",
    "agreement can't be generated for not checked merchant data",
);
pub const AGREEMENT_NOT_GENERATED: ErrorCode =
    ErrorCode::new("ma000021", "agreement for merchant not generated early");
pub const SIGNATURE_HEADER_IS_EMPTY: ErrorCode =
    ErrorCode::new("ma000022", "header with request signature can't be empty");
pub const REQUEST_PARAMS_INCORRECT: ErrorCode =
    ErrorCode::new("ma000023", "incorrect request parameters");
pub const EMAIL_FIELD_INCORRECT: ErrorCode = ErrorCode::new("ma000024", "incorrect email");
pub const REQUEST_DATA_INVALID: ErrorCode = ErrorCode::new("ma000026", "request data invalid");
pub const COUNTRIES_LIST_ERROR: ErrorCode = ErrorCode::new("ma000027", "countries list error");
pub const AGREEMENT_FILE_NOT_EXIST: ErrorCode =
    ErrorCode::new("ma000028", "file for the specified key does not exist");
pub const NOT_MULTIPART_FORM: ErrorCode =
    ErrorCode::new("ma000029", "no multipart boundary param in Content-Type");
pub const UPLOAD_FAILED: ErrorCode = ErrorCode::new("ma000030", "upload failed");
pub const INCORRECT_PROJECT_ID: ErrorCode =
    ErrorCode::new("ma000031", "incorrect project identifier");
pub const INCORRECT_PAYMENT_METHOD_ID: ErrorCode =
    ErrorCode::new("ma000032", "incorrect payment method identifier");
pub const INCORRECT_PAYLINK_ID: ErrorCode =
    ErrorCode::new("ma000033", "incorrect paylink identifier");
pub const AUTHORIZATION_HEADER_NOT_FOUND: ErrorCode =
    ErrorCode::new("ma000034", "authorization header not found");
pub const AUTHORIZATION_TOKEN_NOT_FOUND: ErrorCode =
    ErrorCode::new("ma000035", "authorization token not found");
pub const AUTHORIZED_USER_NOT_FOUND: ErrorCode =
    ErrorCode::new("ma000036", "information about authorized user not found");
pub const STATUS_INCORRECT_TYPE: ErrorCode =
    ErrorCode::new("ma000037", "status parameter has incorrect type");
pub const AGREEMENT_NOT_FOUND: ErrorCode =
    ErrorCode::new("ma000038", "agreement for merchant not found");
pub const AGREEMENT_UPLOAD_MAX_SIZE: ErrorCode =
    ErrorCode::new("ma000039", "agreement document max upload size exceeded");
pub const AGREEMENT_CONTENT_TYPE: ErrorCode =
    ErrorCode::new("ma000040", "agreement document type must be a pdf");
pub const AGREEMENT_TYPE_INCORRECT_TYPE: ErrorCode =
    ErrorCode::new("ma000041", "agreement type parameter have incorrect type");
pub const HAS_MERCHANT_SIGNATURE_INCORRECT_TYPE: ErrorCode =
    ErrorCode::new("ma000042", "merchant signature parameter has incorrect type");
pub const HAS_PSP_SIGNATURE_INCORRECT_TYPE: ErrorCode =
    ErrorCode::new("ma000043", "paysuper signature parameter has incorrect type");
pub const AGREEMENT_SENT_VIA_MAIL_INCORRECT_TYPE: ErrorCode =
    ErrorCode::new("ma000044", "agreement sent via email parameter has incorrect type");
pub const MAIL_TRACKING_LINK_INCORRECT_TYPE: ErrorCode =
    ErrorCode::new("ma000045", "mail tracking link parameter has incorrect type");
pub const NAME_INCORRECT_TYPE: ErrorCode =
    ErrorCode::new("ma000046", "name parameter has incorrect type");
pub const IMAGE_INCORRECT_TYPE: ErrorCode =
    ErrorCode::new("ma000047", "image parameter has incorrect type");
pub const CALLBACK_CURRENCY_INCORRECT_TYPE: ErrorCode =
    ErrorCode::new("ma000048", "callback currency parameter has incorrect type");
pub const CALLBACK_PROTOCOL_INCORRECT_TYPE: ErrorCode =
    ErrorCode::new("ma000049", "callback protocol parameter has incorrect type");
pub const CREATE_ORDER_ALLOWED_URLS_INCORRECT_TYPE: ErrorCode =
    ErrorCode::new("ma000050", "create order allowed urls parameter has incorrect type");
pub const ALLOW_DYNAMIC_NOTIFY_URLS_INCORRECT_TYPE: ErrorCode =
    ErrorCode::new("ma000051", "allow dynamic notify urls parameter has incorrect type");
pub const ALLOW_DYNAMIC_REDIRECT_URLS_INCORRECT_TYPE: ErrorCode =
    ErrorCode::new("ma000052", "allow dynamic redirect urls parameter has incorrect type");
pub const LIMITS_CURRENCY_INCORRECT_TYPE: ErrorCode =
    ErrorCode::new("ma000053", "limits currency parameter has incorrect type");
pub const MIN_PAYMENT_AMOUNT_INCORRECT_TYPE: ErrorCode =
    ErrorCode::new("ma000054", "min payment amount parameter has incorrect type");
pub const MAX_PAYMENT_AMOUNT_INCORRECT_TYPE: ErrorCode =
    ErrorCode::new("ma000055", "max payment amount parameter has incorrect type");
pub const NOTIFY_EMAILS_INCORRECT_TYPE: ErrorCode =
    ErrorCode::new("ma000056", "notify emails parameter has incorrect type");
pub const IS_PRODUCTS_CHECKOUT_INCORRECT_TYPE: ErrorCode =
    ErrorCode::new("ma000057", "is products checkout parameter has incorrect type");
pub const SECRET_KEY_INCORRECT_TYPE: ErrorCode =
    ErrorCode::new("ma000058", "secret key parameter has incorrect type");
pub const SIGNATURE_REQUIRED_INCORRECT_TYPE: ErrorCode =
    ErrorCode::new("ma000059", "signature required parameter has incorrect type");
pub const SEND_NOTIFY_EMAIL_INCORRECT_TYPE: ErrorCode =
    ErrorCode::new("ma000060", "send notify email parameter has incorrect type");
pub const URL_CHECK_ACCOUNT_INCORRECT_TYPE: ErrorCode =
    ErrorCode::new("ma000061", "url check account parameter has incorrect type");
pub const URL_PROCESS_PAYMENT_INCORRECT_TYPE: ErrorCode =
    ErrorCode::new("ma000062", "url process payment parameter has incorrect type");
pub const URL_REDIRECT_FAIL_INCORRECT_TYPE: ErrorCode =
    ErrorCode::new("ma000063", "url redirect fail parameter has incorrect type");
pub const URL_REDIRECT_SUCCESS_INCORRECT_TYPE: ErrorCode =
    ErrorCode::new("ma000064", "url redirect success parameter has incorrect type");
pub const URL_CHARGEBACK_PAYMENT_INCORRECT_TYPE: ErrorCode =
    ErrorCode::new("ma000065", "url chargeback payment parameter has incorrect type");
pub const URL_CANCEL_PAYMENT_INCORRECT_TYPE: ErrorCode =
    ErrorCode::new("ma000066", "url cancel payment parameter has incorrect type");
pub const URL_FRAUD_PAYMENT_INCORRECT_TYPE: ErrorCode =
    ErrorCode::new("ma000067", "url fraud payment parameter has incorrect type");
pub const URL_REFUND_PAYMENT_INCORRECT_TYPE: ErrorCode =
    ErrorCode::new("ma000068", "url refund payment parameter has incorrect type");
pub const PRICE_GROUP_BY_COUNTRY: ErrorCode =
    ErrorCode::new("ma000069", "unable to get price group by country");
pub const PRICE_GROUP_CURRENCY_LIST: ErrorCode =
    ErrorCode::new("ma000070", "unable to get price group currencies");
pub const PRICE_GROUP_CURRENCY_BY_REGION: ErrorCode =
    ErrorCode::new("ma000071", "unable to get price group currency by region");
pub const PRICE_GROUP_RECOMMENDED_LIST: ErrorCode =
    ErrorCode::new("ma000072", "unable to get price group recommended prices");
pub const GET_PRODUCT_PRICE: ErrorCode = ErrorCode::new("ma000072", "unable to get price of product");
pub const UPDATE_PRODUCT_PRICE: ErrorCode =
    ErrorCode::new("ma000072", "unable to update price of product");
pub const INCORRECT_ZIP: ErrorCode = ErrorCode::new("ma000073", "incorrect zip code");
pub const INCORRECT_NUMBER_OF_EMPLOYEES: ErrorCode =
    ErrorCode::new("ma000074", "incorrect number of employees value");
pub const INCORRECT_ANNUAL_INCOME: ErrorCode =
    ErrorCode::new("ma000075", "incorrect annual income value");
pub const INCORRECT_COMPANY_NAME: ErrorCode = ErrorCode::new("ma000076", "incorrect company name");
pub const INCORRECT_POSITION: ErrorCode = ErrorCode::new("ma000077", "incorrect position");
pub const INCORRECT_FIRST_NAME: ErrorCode = ErrorCode::new("ma000078", "incorrect first name");
pub const INCORRECT_LAST_NAME: ErrorCode = ErrorCode::new("ma000079", "incorrect last name");
pub const INCORRECT_WEBSITE: ErrorCode = ErrorCode::new("ma000080", "incorrect website");
pub const INCORRECT_KIND_OF_ACTIVITY: ErrorCode =
    ErrorCode::new("ma000081", "incorrect kind of activity");
pub const INCORRECT_REVIEW: ErrorCode = ErrorCode::new(
    "ma000082",
    "review must be text with length lower than or equal 500 characters",
);
pub const INCORRECT_PAGE_ID: ErrorCode = ErrorCode::new(
    "ma000083",
    "review page identifier must be one of next values: primary_onboarding, merchant_onboarding",
);
pub const KEY_PRODUCT_ID_INVALID: ErrorCode = ErrorCode::new("ma000082", "key product id is invalid");
pub const PLATFORM_ID_INVALID: ErrorCode = ErrorCode::new("ma000083", "platform id is invalid");
pub const INCORRECT_ALTERNATIVE_NAME: ErrorCode = ErrorCode::new("ma000084", "incorrect brand");
pub const INCORRECT_STATE: ErrorCode = ErrorCode::new("ma000085", "incorrect state");
pub const INCORRECT_CITY: ErrorCode = ErrorCode::new("ma000086", "incorrect city");
pub const INCORRECT_ADDRESS: ErrorCode = ErrorCode::new("ma000087", "incorrect address");
pub const REQUIRED_CONTACT_AUTHORIZED: ErrorCode = ErrorCode::new(
    "ma000088",
    "company authorized contact information is required",
);
pub const REQUIRED_CONTACT_TECHNICAL: ErrorCode = ErrorCode::new(
    "ma000089",
    "company technical contact information is required",
);
pub const INCORRECT_NAME: ErrorCode = ErrorCode::new("ma000090", "incorrect name");
pub const INCORRECT_PHONE: ErrorCode = ErrorCode::new("ma000091", "incorrect phone");
pub const INCORRECT_BANK_NAME: ErrorCode = ErrorCode::new("ma000092", "incorrect bank name");
pub const INCORRECT_BANK_ADDRESS: ErrorCode = ErrorCode::new("ma000093", "incorrect bank address");
pub const INCORRECT_BANK_ACCOUNT_NUMBER: ErrorCode =
    ErrorCode::new("ma000094", "incorrect bank accounting number");
pub const INCORRECT_BANK_SWIFT: ErrorCode = ErrorCode::new("ma000095", "incorrect bank swift code");
pub const INCORRECT_BANK_CORRESPONDENT_ACCOUNT: ErrorCode =
    ErrorCode::new("ma000096", "incorrect bank correspondent account");
pub const FILE_NOT_FOUND: ErrorCode = ErrorCode::new("ma000097", "file with key was not specified");
pub const CANT_READ_FILE: ErrorCode = ErrorCode::new("ma000098", "file can not be read");
pub const INCORRECT_PERIOD: ErrorCode = ErrorCode::new("ma000099", "incorrect period");
pub const MERCHANT_NOT_FOUND: ErrorCode = ErrorCode::new("ma000100", "merchant not found");
pub const CREATE_REPORT_FILE: ErrorCode = ErrorCode::new("ma000101", "unable to create report file");
pub const DOWNLOAD_REPORT_FILE: ErrorCode =
    ErrorCode::new("ma000102", "unable to download report file");
pub const LOCALIZED_FIELD_INCORRECT_TYPE: ErrorCode =
    ErrorCode::new("ma000103", "localized field has invalid type");
pub const COVER_FIELD_INCORRECT_TYPE: ErrorCode =
    ErrorCode::new("ma000104", "cover field has invalid type");
pub const UNABLE_TO_SEND_INVITE: ErrorCode = ErrorCode::new("ma000105", "unable to send invite");
pub const UNABLE_TO_ACCEPT_INVITE: ErrorCode = ErrorCode::new("ma000106", "unable to accept invite");
pub const UNABLE_TO_CHECK_INVITE_TOKEN: ErrorCode =
    ErrorCode::new("ma000107", "unable to check invite token");
pub const INVALID_ROLE_TYPE: ErrorCode = ErrorCode::new("ma000108", "invalid role type");
pub const UNABLE_TO_DELETE_USER: ErrorCode = ErrorCode::new("ma000109", "unable to delete user");

/// Errors chosen by leaf field name when validation fails.
pub const FIELD_ERRORS: &[(&str, ErrorCode)] = &[
    ("number_of_employees", INCORRECT_NUMBER_OF_EMPLOYEES),
    ("annual_income", INCORRECT_ANNUAL_INCOME),
    ("company_name", INCORRECT_COMPANY_NAME),
    ("position", INCORRECT_POSITION),
    ("first_name", INCORRECT_FIRST_NAME),
    ("last_name", INCORRECT_LAST_NAME),
    ("website", INCORRECT_WEBSITE),
    ("kind_of_activity", INCORRECT_KIND_OF_ACTIVITY),
    ("review", INCORRECT_REVIEW),
    ("page_id", INCORRECT_PAGE_ID),
];

/// Errors chosen by `<RequestType>.<field path>` when validation fails.
pub const NAMESPACE_ERRORS: &[(&str, ErrorCode)] = &[
    ("OnboardingRequest.company.name", INCORRECT_COMPANY_NAME),
    ("OnboardingRequest.company.alternative_name", INCORRECT_ALTERNATIVE_NAME),
    ("OnboardingRequest.company.website", INCORRECT_WEBSITE),
    ("OnboardingRequest.company.country", INCORRECT_COUNTRY_IDENTIFIER),
    ("OnboardingRequest.company.state", INCORRECT_STATE),
    ("OnboardingRequest.company.zip", INCORRECT_ZIP),
    ("OnboardingRequest.company.city", INCORRECT_CITY),
    ("OnboardingRequest.company.address", INCORRECT_ADDRESS),
    ("OnboardingRequest.contacts.authorized", REQUIRED_CONTACT_AUTHORIZED),
    ("OnboardingRequest.contacts.technical", REQUIRED_CONTACT_TECHNICAL),
    ("OnboardingRequest.contacts.authorized.name", INCORRECT_NAME),
    ("OnboardingRequest.contacts.authorized.email", EMAIL_FIELD_INCORRECT),
    ("OnboardingRequest.contacts.authorized.phone", INCORRECT_PHONE),
    ("OnboardingRequest.contacts.authorized.position", INCORRECT_POSITION),
    ("OnboardingRequest.contacts.technical.name", INCORRECT_NAME),
    ("OnboardingRequest.contacts.technical.email", EMAIL_FIELD_INCORRECT),
    ("OnboardingRequest.contacts.technical.phone", INCORRECT_PHONE),
    ("OnboardingRequest.banking.currency", INCORRECT_CURRENCY_IDENTIFIER),
    ("OnboardingRequest.banking.name", INCORRECT_BANK_NAME),
    ("OnboardingRequest.banking.address", INCORRECT_BANK_ADDRESS),
    ("OnboardingRequest.banking.account_number", INCORRECT_BANK_ACCOUNT_NUMBER),
    ("OnboardingRequest.banking.swift", INCORRECT_BANK_SWIFT),
    (
        "OnboardingRequest.banking.correspondent_account",
        INCORRECT_BANK_CORRESPONDENT_ACCOUNT,
    ),
    ("DashboardMainRequest.merchant_id", INCORRECT_MERCHANT_ID),
    ("DashboardMainRequest.period", INCORRECT_PERIOD),
    ("DashboardBaseReportRequest.merchant_id", INCORRECT_MERCHANT_ID),
    ("DashboardBaseReportRequest.period", INCORRECT_PERIOD),
    ("PageReviewRequest.url", INCORRECT_PAGE_ID),
];

pub fn field_error(field: &str) -> Option<ErrorCode> {
    FIELD_ERRORS
        .iter()
        .find(|(name, _)| *name == field)
        .map(|(_, code)| *code)
}

pub fn namespace_error(namespace: &str) -> Option<ErrorCode> {
    NAMESPACE_ERRORS
        .iter()
        .find(|(name, _)| *name == namespace)
        .map(|(_, code)| *code)
}
