//! Request field names, headers and lookup tables shared by handlers.

pub const HEADER_ACCEPT_LANGUAGE: &str = "accept-language";
pub const HEADER_USER_AGENT: &str = "user-agent";
pub const HEADER_REFERER: &str = "referer";
pub const HEADER_X_API_SIGNATURE: &str = "x-api-signature";
pub const HEADER_X_FORWARDED_FOR: &str = "x-forwarded-for";
pub const HEADER_X_REAL_IP: &str = "x-real-ip";
/// Header carrying the CardPay callback signature.
pub const HEADER_CARDPAY_SIGNATURE: &str = "signature";

pub const CUSTOMER_TOKEN_COOKIE: &str = "_ps_ctkn";

pub const AUTHORIZATION_TOKEN_PATTERN: &str = r"Bearer ([A-z0-9_.-]{10,})";

pub const VALIDATION_DETAILS_MASK: &str = "field validation for '{field}' failed on the '{tag}' tag";

pub fn validation_details(field: &str, tag: &str) -> String {
    VALIDATION_DETAILS_MASK
        .replace("{field}", field)
        .replace("{tag}", tag)
}

/// Order form fields consumed by the checkout binder; everything else is
/// forwarded to billing as free-form `other` parameters.
pub mod order_fields {
    pub const PROJECT_ID: &str = "PP_PROJECT_ID";
    pub const SIGNATURE: &str = "PP_SIGNATURE";
    pub const AMOUNT: &str = "PP_AMOUNT";
    pub const CURRENCY: &str = "PP_CURRENCY";
    pub const ACCOUNT: &str = "PP_ACCOUNT";
    pub const ORDER_ID: &str = "PP_ORDER_ID";
    pub const PAYMENT_METHOD: &str = "PP_PAYMENT_METHOD";
    pub const URL_VERIFY: &str = "PP_URL_VERIFY";
    pub const URL_NOTIFY: &str = "PP_URL_NOTIFY";
    pub const URL_SUCCESS: &str = "PP_URL_SUCCESS";
    pub const URL_FAIL: &str = "PP_URL_FAIL";
    pub const PAYER_EMAIL: &str = "PP_PAYER_EMAIL";
    pub const PAYER_PHONE: &str = "PP_PAYER_PHONE";
    pub const DESCRIPTION: &str = "PP_DESCRIPTION";
    pub const REGION: &str = "PP_REGION";

    pub const RESERVED: &[&str] = &[
        PROJECT_ID,
        SIGNATURE,
        AMOUNT,
        CURRENCY,
        ACCOUNT,
        ORDER_ID,
        DESCRIPTION,
        PAYMENT_METHOD,
        URL_VERIFY,
        URL_NOTIFY,
        URL_SUCCESS,
        URL_FAIL,
        PAYER_EMAIL,
        PAYER_PHONE,
        REGION,
    ];

    pub fn is_reserved(field: &str) -> bool {
        RESERVED.contains(&field)
    }
}

/// Payment cost regions accepted by the `world_region` rule.
pub const TARIFF_REGIONS: &[(&str, &str)] = &[
    ("cis", "CIS"),
    ("russia", "Russia"),
    ("west_asia", "West Asia"),
    ("eu", "EU"),
    ("north_america", "North America"),
    ("central_america", "Central America"),
    ("south_america", "South America"),
    ("uk", "United Kingdom"),
    ("worldwide", "Worldwide"),
    ("south_pacific", "South Pacific"),
];

pub fn tariff_region_name(key: &str) -> Option<&'static str> {
    TARIFF_REGIONS
        .iter()
        .find(|(code, _)| *code == key)
        .map(|(_, name)| *name)
}

/// Merchant home regions accepted by the `tariff_region` rule.
pub const HOME_REGIONS: &[&str] = &[
    "russia_and_cis",
    "europe",
    "asia",
    "latin_america",
    "worldwide",
];

pub const USER_PROFILE_POSITIONS: &[&str] = &[
    "CEO",
    "CTO",
    "CMO",
    "CFO",
    "Project Management",
    "Generic Management",
    "Software Developer",
    "Marketing",
    "Support",
];

/// `(from, to)` pairs; `to == 0` means unbounded.
pub const ANNUAL_INCOME_RANGES: &[(i64, i64)] = &[
    (0, 1_000),
    (1_000, 10_000),
    (10_000, 100_000),
    (100_000, 1_000_000),
    (1_000_000, 0),
];

pub const NUMBER_OF_EMPLOYEES_RANGES: &[(i64, i64)] = &[(1, 10), (11, 50), (51, 100), (100, 0)];

/// Agreement document naming.
pub const AGREEMENT_FILE_PREFIX: &str = "agreement_";
pub const AGREEMENT_CONTENT_TYPE: &str = "application/pdf";
pub const AGREEMENT_UPLOAD_MAX_SIZE: usize = 3 * 1024 * 1024;

pub fn agreement_file_name(merchant_id: &str) -> String {
    format!("{AGREEMENT_FILE_PREFIX}{merchant_id}.pdf")
}

pub fn agreement_url(scheme: &str, host: &str, merchant_id: &str) -> String {
    format!("{scheme}://{host}/admin/api/v1/merchants/{merchant_id}/agreement/document")
}

/// Report files are stored as `report_{user_id}_{file_id}.{extension}`.
pub fn report_file_key(user_id: &str, file_id: &str, extension: &str) -> String {
    format!("report_{user_id}_{file_id}.{extension}")
}

/// Callback protocol of a project that receives no payment callbacks.
pub const PROJECT_CALLBACK_PROTOCOL_EMPTY: &str = "empty";
