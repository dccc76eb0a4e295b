//! Identifier resolution.
//!
//! A numeric id is authoritative and is only looked up to verify the other
//! identity hints. Without an id, the symbol map is queried and a candidate is
//! picked by name, or the first one in provider order when no name is given.
//! Disagreements never fail the request; they surface as [`Advisory`] values.

use std::fmt::{Display, Formatter};

use serde::Serialize;

use crate::data_source::{DataSource, ScrapeError};
use crate::{CoinCandidate, CoinKey, ResolvedIdentity, ScrapeRequest};

/// Non-fatal diagnostic raised while resolving or verifying an identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Advisory {
    /// Requested symbol disagrees with the symbol the id resolves to.
    SymbolMismatch { requested: String, canonical: String },
    /// Requested name disagrees with the name the id resolves to.
    NameMismatch { requested: String, canonical: String },
    /// Several coins share the symbol and no name picked one.
    AmbiguousSymbol {
        symbol: String,
        chosen: String,
        candidates: usize,
    },
    /// The history payload names a different coin than the one resolved.
    PayloadIdentityMismatch { expected: String, reported: String },
}

impl Display for Advisory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SymbolMismatch {
                requested,
                canonical,
            } => write!(
                f,
                "requested symbol '{requested}' does not match '{canonical}' for the given id; using the id"
            ),
            Self::NameMismatch {
                requested,
                canonical,
            } => write!(
                f,
                "requested name '{requested}' does not match '{canonical}' for the given id; using the id"
            ),
            Self::AmbiguousSymbol {
                symbol,
                chosen,
                candidates,
            } => write!(
                f,
                "{candidates} coins share symbol '{symbol}'; picked '{chosen}' (pass a coin name or id to choose)"
            ),
            Self::PayloadIdentityMismatch { expected, reported } => write!(
                f,
                "history payload reports '{reported}' but '{expected}' was requested"
            ),
        }
    }
}

/// Resolved identity plus whatever advisories resolution produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub identity: ResolvedIdentity,
    pub advisories: Vec<Advisory>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IdentifierResolver;

impl IdentifierResolver {
    pub fn new() -> Self {
        Self
    }

    /// Resolve the identity hints carried by `request`.
    pub fn resolve_request(
        &self,
        source: &dyn DataSource,
        request: &ScrapeRequest,
    ) -> Result<Resolution, ScrapeError> {
        self.resolve(
            source,
            request.symbol().map(|symbol| symbol.as_str()),
            request.disambiguating_name(),
            request.numeric_id(),
        )
    }

    /// # Errors
    ///
    /// `InvalidCoinCode` when the symbol has no match, or when `name` matches none
    /// of its candidates. Upstream and transport failures of the lookup propagate.
    pub fn resolve(
        &self,
        source: &dyn DataSource,
        symbol: Option<&str>,
        name: Option<&str>,
        numeric_id: Option<u64>,
    ) -> Result<Resolution, ScrapeError> {
        let resolution = match numeric_id {
            Some(id) => Self::resolve_id(source, id, symbol, name)?,
            None => {
                let symbol = symbol.ok_or_else(|| {
                    ScrapeError::invalid_parameters("either a symbol or a numeric id is required")
                })?;
                Self::resolve_symbol(source, symbol, name)?
            }
        };

        for advisory in &resolution.advisories {
            tracing::warn!(provider = %source.id(), "{advisory}");
        }
        tracing::debug!(
            id = %resolution.identity.canonical_id,
            symbol = %resolution.identity.matched_symbol,
            name = %resolution.identity.matched_name,
            "resolved coin identity"
        );

        Ok(resolution)
    }

    fn resolve_id(
        source: &dyn DataSource,
        id: u64,
        symbol: Option<&str>,
        name: Option<&str>,
    ) -> Result<Resolution, ScrapeError> {
        let canonical = source.lookup_id(id)?;

        let mut advisories = Vec::new();
        if let Some(symbol) = symbol {
            if !symbol.eq_ignore_ascii_case(&canonical.symbol) {
                advisories.push(Advisory::SymbolMismatch {
                    requested: symbol.to_owned(),
                    canonical: canonical.symbol.clone(),
                });
            }
        }
        if let Some(name) = name {
            if !name.trim().eq_ignore_ascii_case(&canonical.name) {
                advisories.push(Advisory::NameMismatch {
                    requested: name.to_owned(),
                    canonical: canonical.name.clone(),
                });
            }
        }

        let mut identity = ResolvedIdentity::from_candidate(&canonical);
        identity.canonical_id = CoinKey::Id(id);

        Ok(Resolution {
            identity,
            advisories,
        })
    }

    fn resolve_symbol(
        source: &dyn DataSource,
        symbol: &str,
        name: Option<&str>,
    ) -> Result<Resolution, ScrapeError> {
        let parsed = crate::CoinSymbol::parse(symbol)?;
        let candidates = source.lookup_symbol(&parsed)?;

        if let Some(name) = name {
            let wanted = name.trim();
            let chosen = candidates
                .iter()
                .find(|candidate| {
                    candidate.name.eq_ignore_ascii_case(wanted)
                        || candidate.slug.eq_ignore_ascii_case(wanted)
                })
                .ok_or_else(|| {
                    ScrapeError::invalid_coin_code(&format!("{} ({wanted})", parsed.as_str()))
                })?;
            return Ok(Resolution {
                identity: ResolvedIdentity::from_candidate(chosen),
                advisories: Vec::new(),
            });
        }

        let chosen: &CoinCandidate = candidates
            .first()
            .ok_or_else(|| ScrapeError::invalid_coin_code(parsed.as_str()))?;

        let mut advisories = Vec::new();
        if candidates.len() > 1 {
            advisories.push(Advisory::AmbiguousSymbol {
                symbol: parsed.as_str().to_owned(),
                chosen: chosen.name.clone(),
                candidates: candidates.len(),
            });
        }

        Ok(Resolution {
            identity: ResolvedIdentity::from_candidate(chosen),
            advisories,
        })
    }
}

/// Compare the identity a history payload reports with the resolved one.
pub fn check_reported_identity(
    resolved: &ResolvedIdentity,
    reported: &CoinCandidate,
) -> Option<Advisory> {
    let id_differs = match (&resolved.canonical_id, reported.id) {
        (CoinKey::Id(expected), Some(actual)) => *expected != actual,
        _ => false,
    };
    let symbol_differs = !resolved.matched_symbol.eq_ignore_ascii_case(&reported.symbol);

    (id_differs || symbol_differs).then(|| Advisory::PayloadIdentityMismatch {
        expected: format!("{} ({})", resolved.matched_name, resolved.matched_symbol),
        reported: format!("{} ({})", reported.name, reported.symbol),
    })
}
