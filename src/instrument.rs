//! Option chain generation
//!
//! Builds the batch of instrument names fetched by both strategies: a ladder of
//! ten strikes around the current index price, crossed with call/put, rendered
//! through a positional template such as `BTC-{0}-{1}-{2}`.

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::fmt;
use tracing::{debug, info};

use crate::fetcher::{FetcherError, IndexPriceSource};
use crate::{InstrumentId, OptionKind};

/// Number of strikes in a ladder
pub const STRIKE_COUNT: usize = 10;

/// Strikes placed below the center strike
pub const STRIKES_BELOW_CENTER: i64 = 5;

const EXPIRY_PLACEHOLDER: &str = "{0}";
const STRIKE_PLACEHOLDER: &str = "{1}";
const KIND_PLACEHOLDER: &str = "{2}";

/// `chrono` format of an expiry token; `%y` maps 70-99 to the 1900s
const EXPIRY_FORMAT: &str = "%d%b%y";

/// Errors that can occur while generating a batch
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// Reference price could not be obtained
    #[error("lookup error: {0}")]
    Lookup(#[source] FetcherError),

    /// Malformed generator input
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Maturity token in exchange notation `D[D]MMMYY` (e.g. `31JAN25`, `7FEB25`)
///
/// Input is case-insensitive and normalized to uppercase.
///
/// # Examples
///
/// ```
/// use options_fetch_bench::instrument::Expiry;
///
/// let expiry = Expiry::parse("31jan25").unwrap();
/// assert_eq!(expiry.as_str(), "31JAN25");
/// assert_eq!(expiry.date().to_string(), "2025-01-31");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Expiry {
    token: String,
    date: NaiveDate,
}

impl Expiry {
    /// Parse and validate an expiry token
    ///
    /// # Errors
    ///
    /// Returns `GenerateError::InvalidParameter` if the token is malformed or
    /// names a date that does not exist.
    pub fn parse(s: &str) -> Result<Self, GenerateError> {
        let token = s.trim().to_uppercase();
        let invalid = |reason: &str| {
            GenerateError::InvalidParameter(format!(
                "invalid expiry '{token}': {reason} (expected e.g. 31JAN25)"
            ))
        };

        let date = NaiveDate::parse_from_str(&token, EXPIRY_FORMAT)
            .map_err(|e| invalid(&e.to_string()))?;

        Ok(Self { token, date })
    }

    /// Normalized token as rendered into instrument names
    pub fn as_str(&self) -> &str {
        &self.token
    }

    /// Calendar date of the expiry
    pub fn date(&self) -> NaiveDate {
        self.date
    }
}

impl fmt::Display for Expiry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.token)
    }
}

/// Instrument name template with positional placeholders
///
/// `{0}` is the expiry, `{1}` the strike and `{2}` the option type flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstrumentTemplate {
    template: String,
}

impl InstrumentTemplate {
    /// Parse a template, requiring all three placeholders
    ///
    /// # Errors
    ///
    /// Returns `GenerateError::InvalidParameter` if a placeholder is missing.
    pub fn parse(s: &str) -> Result<Self, GenerateError> {
        for placeholder in [EXPIRY_PLACEHOLDER, STRIKE_PLACEHOLDER, KIND_PLACEHOLDER] {
            if !s.contains(placeholder) {
                return Err(GenerateError::InvalidParameter(format!(
                    "template '{s}' is missing placeholder {placeholder}"
                )));
            }
        }

        Ok(Self {
            template: s.to_string(),
        })
    }

    /// Template source text
    pub fn as_str(&self) -> &str {
        &self.template
    }

    /// Render one instrument name
    pub fn render(&self, expiry: &Expiry, strike: i64, kind: OptionKind) -> InstrumentId {
        let name = self
            .template
            .replace(EXPIRY_PLACEHOLDER, expiry.as_str())
            .replace(STRIKE_PLACEHOLDER, &strike.to_string())
            .replace(KIND_PLACEHOLDER, &kind.to_string());
        InstrumentId::new(name)
    }
}

/// Ten strikes around a center strike
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrikeLadder {
    center: i64,
    strikes: Vec<i64>,
}

impl StrikeLadder {
    /// Build the ladder for `reference_price`
    ///
    /// The center strike is the smallest multiple of `interval` that is not
    /// below the reference price; the ladder starts five intervals under it.
    ///
    /// # Errors
    ///
    /// Returns `GenerateError::InvalidParameter` if `interval` is not positive
    /// or the reference price is not a finite positive number.
    pub fn around(reference_price: f64, interval: i64) -> Result<Self, GenerateError> {
        if interval <= 0 {
            return Err(GenerateError::InvalidParameter(format!(
                "strike interval must be positive, got {interval}"
            )));
        }
        if !reference_price.is_finite() || reference_price <= 0.0 {
            return Err(GenerateError::InvalidParameter(format!(
                "reference price must be positive, got {reference_price}"
            )));
        }

        let price = Decimal::from_f64_retain(reference_price).ok_or_else(|| {
            GenerateError::InvalidParameter(format!(
                "reference price {reference_price} is out of range"
            ))
        })?;
        let step = Decimal::from(interval);
        let out_of_range = || {
            GenerateError::InvalidParameter(format!(
                "strikes around {reference_price} at interval {interval} do not fit in i64"
            ))
        };

        let center = price
            .checked_div(step)
            .map(|ratio| ratio.ceil())
            .and_then(|ratio| ratio.checked_mul(step))
            .ok_or_else(out_of_range)?;
        let lowest = step
            .checked_mul(Decimal::from(STRIKES_BELOW_CENTER))
            .and_then(|below| center.checked_sub(below))
            .ok_or_else(out_of_range)?;

        let strikes = (0..STRIKE_COUNT as i64)
            .map(|i| {
                step.checked_mul(Decimal::from(i))
                    .and_then(|offset| lowest.checked_add(offset))
                    .and_then(|strike| strike.to_i64())
                    .ok_or_else(out_of_range)
            })
            .collect::<Result<Vec<_>, _>>()?;
        let center = center.to_i64().ok_or_else(out_of_range)?;

        Ok(Self { center, strikes })
    }

    /// Center strike
    pub fn center(&self) -> i64 {
        self.center
    }

    /// Strikes in ascending order
    pub fn strikes(&self) -> &[i64] {
        &self.strikes
    }
}

/// Ordered batch of instruments shared by every strategy in a run
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InstrumentBatch {
    ids: Vec<InstrumentId>,
}

impl InstrumentBatch {
    /// Number of instruments
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the batch is empty
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Instruments in generation order
    pub fn ids(&self) -> &[InstrumentId] {
        &self.ids
    }

    /// Iterate in generation order
    pub fn iter(&self) -> std::slice::Iter<'_, InstrumentId> {
        self.ids.iter()
    }
}

impl From<Vec<InstrumentId>> for InstrumentBatch {
    fn from(ids: Vec<InstrumentId>) -> Self {
        Self { ids }
    }
}

impl<'a> IntoIterator for &'a InstrumentBatch {
    type Item = &'a InstrumentId;
    type IntoIter = std::slice::Iter<'a, InstrumentId>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids.iter()
    }
}

/// Build the batch for a known reference price
///
/// Calls come first, then puts; strikes ascend within each block.
pub fn build_batch(
    template: &InstrumentTemplate,
    expiry: &Expiry,
    reference_price: f64,
    strike_interval: i64,
) -> Result<(StrikeLadder, InstrumentBatch), GenerateError> {
    let ladder = StrikeLadder::around(reference_price, strike_interval)?;

    let ids: Vec<InstrumentId> = OptionKind::ALL
        .iter()
        .flat_map(|kind| {
            ladder
                .strikes()
                .iter()
                .map(move |strike| template.render(expiry, *strike, *kind))
        })
        .collect();

    for id in &ids {
        debug!(instrument = %id, "Generated instrument");
    }

    Ok((ladder, InstrumentBatch::from(ids)))
}

/// Look up the index price for `asset` and build the batch around it
///
/// # Errors
///
/// - `GenerateError::InvalidParameter` if `strike_interval` is not positive
/// - `GenerateError::Lookup` if the index price cannot be obtained or is not
///   a usable positive number
pub fn generate<S: IndexPriceSource + ?Sized>(
    source: &S,
    template: &InstrumentTemplate,
    asset: &str,
    expiry: &Expiry,
    strike_interval: i64,
) -> Result<InstrumentBatch, GenerateError> {
    // Reject bad input before spending a network round trip
    if strike_interval <= 0 {
        return Err(GenerateError::InvalidParameter(format!(
            "strike interval must be positive, got {strike_interval}"
        )));
    }

    let reference_price = source.index_price(asset).map_err(GenerateError::Lookup)?;
    let usable = reference_price.is_finite()
        && reference_price > 0.0
        && Decimal::from_f64_retain(reference_price).is_some();
    if !usable {
        return Err(GenerateError::Lookup(FetcherError::ParseError(format!(
            "index price for {asset} must be a positive number, got {reference_price}"
        ))));
    }
    let (ladder, batch) = build_batch(template, expiry, reference_price, strike_interval)?;

    info!(
        asset = %asset,
        expiry = %expiry,
        reference_price,
        center_strike = ladder.center(),
        instruments = batch.len(),
        "Instrument batch generated"
    );

    Ok(batch)
}
