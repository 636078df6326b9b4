//! Typed failure reasons, carried inside [`anyhow::Error`] and recoverable via `downcast_ref`.

/// The credential or token was rejected, fatal to the whole run.
#[derive(Debug, thiserror::Error)]
#[error("authentication failed: {0}")]
pub struct AuthenticationError(pub String);

/// Malformed or missing account data, fatal to the whole run.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum AccountError {
    #[error("the account is not found or not accessible")]
    AccountNotFound,

    #[error("no matching IMPORT meter point found in account data")]
    NoMatchingMeterPoint,

    #[error("no tariff information found for the IMPORT meter")]
    NoTariffInfo,

    #[error("no device ID found for the IMPORT meter")]
    NoDeviceId,
}

/// The plan could not be located in the catalog, scoped to that plan.
#[derive(Debug, Eq, PartialEq, thiserror::Error)]
pub enum ResolutionError {
    #[error("no matching product found for `{0}`")]
    PlanNotFound(String),

    #[error("self link not found for product `{0}`")]
    SelfLinkMissing(String),

    #[error("region `{0}` not found")]
    RegionNotFound(String),

    #[error("no payment method found for region `{0}`")]
    PaymentMethodNotFound(String),

    #[error("standing charge including VAT not found for region `{0}`")]
    StandingChargeMissing(String),

    #[error("standard unit rates link not found for region `{0}`")]
    UnitRatesLinkMissing(String),
}
