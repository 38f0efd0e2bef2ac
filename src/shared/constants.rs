pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Password-reset tokens expire after 30 minutes.
pub const RESET_TOKEN_TTL_MINUTES: i64 = 30;

/// Length of the short code attached to each questionnaire response.
pub const RESPONSE_CODE_LEN: usize = 8;
