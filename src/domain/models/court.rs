use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use crate::error::AppError;
use url::Url;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq)]
pub struct Court {
    pub id: String,
    pub name: String,
    pub location: String,
    pub price_per_hour: f64,
    pub max_players: i32,
    pub latitude: f64,
    pub longitude: f64,
    pub image_url: Option<String>,
    pub manager_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

pub struct NewCourtParams {
    pub details: CourtPatch,
    pub latitude: f64,
    pub longitude: f64,
    pub manager_id: Option<String>,
}

impl Court {
    pub fn new(params: NewCourtParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: params.details.name,
            location: params.details.location,
            price_per_hour: params.details.price_per_hour,
            max_players: params.details.max_players,
            latitude: params.latitude,
            longitude: params.longitude,
            image_url: params.details.image_url,
            manager_id: params.manager_id,
            created_at: Utc::now(),
        }
    }
}

/// Editable fields of a court. `manager_id` is deliberately absent: ownership never changes.
#[derive(Debug, Clone, Deserialize)]
pub struct CourtPatch {
    pub name: String,
    pub location: String,
    pub price_per_hour: f64,
    pub max_players: i32,
    pub image_url: Option<String>,
}

impl CourtPatch {
    /// Checks the edit-form rules and normalizes an empty image URL to `None`.
    pub fn validated(mut self) -> Result<Self, AppError> {
        self.name = self.name.trim().to_string();
        self.location = self.location.trim().to_string();

        if self.name.chars().count() < 3 {
            return Err(AppError::Validation("Nome deve ter pelo menos 3 caracteres.".into()));
        }
        if self.location.chars().count() < 5 {
            return Err(AppError::Validation("Localização deve ter pelo menos 5 caracteres.".into()));
        }
        if !(self.price_per_hour.is_finite() && self.price_per_hour > 0.0) {
            return Err(AppError::Validation("Preço deve ser um número positivo.".into()));
        }
        if self.max_players <= 0 {
            return Err(AppError::Validation("Capacidade deve ser um inteiro positivo.".into()));
        }

        self.image_url = match self.image_url.map(|u| u.trim().to_string()) {
            None => None,
            Some(u) if u.is_empty() => None,
            Some(u) if is_http_url(&u) => Some(u),
            Some(_) => return Err(AppError::Validation("URL da imagem inválida.".into())),
        };

        Ok(self)
    }
}

fn is_http_url(raw: &str) -> bool {
    match Url::parse(raw) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host_str().is_some_and(|h| !h.is_empty()),
        Err(_) => false,
    }
}

/// Inclusive lower bound, optional inclusive upper bound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRange {
    pub min: f64,
    pub max: Option<f64>,
}

impl PriceRange {
    /// Parses `"0-50"`, `"100+"` or `"100-"`. `"any"` and empty mean no filter.
    pub fn parse(raw: &str) -> Result<Option<Self>, AppError> {
        let raw = raw.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case("any") {
            return Ok(None);
        }
        let invalid = || AppError::Validation(format!("Invalid price filter '{raw}'"));

        let (min, max) = if let Some(min) = raw.strip_suffix('+') {
            (min, None)
        } else {
            let (min, max) = raw.split_once('-').ok_or_else(invalid)?;
            (min, if max.trim().is_empty() { None } else { Some(max) })
        };

        let min: f64 = min.trim().parse().map_err(|_| invalid())?;
        let max = max.map(|m| m.trim().parse::<f64>()).transpose().map_err(|_| invalid())?;

        if !min.is_finite() || min < 0.0 || max.is_some_and(|m| !m.is_finite() || m < min) {
            return Err(invalid());
        }
        Ok(Some(Self { min, max }))
    }

    pub fn contains(&self, price: f64) -> bool {
        price >= self.min && self.max.is_none_or(|max| price <= max)
    }
}

/// Directory query filters; every field is optional and they intersect.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CourtFilters {
    pub search_term: Option<String>,
    pub price_range: Option<PriceRange>,
    /// Exact match against `max_players`.
    pub capacity: Option<i32>,
}

impl CourtFilters {
    pub fn parse(search: Option<&str>, price: Option<&str>, capacity: Option<&str>) -> Result<Self, AppError> {
        let search_term = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        let price_range = match price {
            Some(p) => PriceRange::parse(p)?,
            None => None,
        };

        let capacity = match capacity.map(str::trim) {
            None | Some("") => None,
            Some(c) if c.eq_ignore_ascii_case("any") => None,
            Some(c) => {
                let n: i32 = c.parse().map_err(|_| AppError::Validation(format!("Invalid capacity filter '{c}'")))?;
                if n <= 0 {
                    return Err(AppError::Validation(format!("Invalid capacity filter '{c}'")));
                }
                Some(n)
            }
        };

        Ok(Self { search_term, price_range, capacity })
    }

    pub fn matches(&self, court: &Court) -> bool {
        let text_ok = self.search_term.as_ref().is_none_or(|term| {
            let term = term.to_lowercase();
            court.name.to_lowercase().contains(&term) || court.location.to_lowercase().contains(&term)
        });
        let price_ok = self.price_range.is_none_or(|r| r.contains(court.price_per_hour));
        let capacity_ok = self.capacity.is_none_or(|c| court.max_players == c);
        text_ok && price_ok && capacity_ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn court(name: &str, location: &str, price: f64, max_players: i32) -> Court {
        Court::new(NewCourtParams {
            details: CourtPatch {
                name: name.into(),
                location: location.into(),
                price_per_hour: price,
                max_players,
                image_url: None,
            },
            latitude: 0.0,
            longitude: 0.0,
            manager_id: None,
        })
    }

    #[test]
    fn price_brackets_parse() {
        assert_eq!(PriceRange::parse("0-50").unwrap(), Some(PriceRange { min: 0.0, max: Some(50.0) }));
        assert_eq!(PriceRange::parse("100+").unwrap(), Some(PriceRange { min: 100.0, max: None }));
        assert_eq!(PriceRange::parse("100-").unwrap(), Some(PriceRange { min: 100.0, max: None }));
        assert_eq!(PriceRange::parse("any").unwrap(), None);
        assert_eq!(PriceRange::parse("").unwrap(), None);
        assert!(PriceRange::parse("cheap").is_err());
        assert!(PriceRange::parse("50-10").is_err());
    }

    #[test]
    fn price_bounds_are_inclusive() {
        let r = PriceRange::parse("0-50").unwrap().unwrap();
        assert!(r.contains(0.0));
        assert!(r.contains(50.0));
        assert!(!r.contains(50.01));
    }

    #[test]
    fn filters_intersect() {
        let courts = [
            court("Quadra Central", "Centro", 60.0, 10),
            court("Quadra Bairro Novo", "Bairro X", 40.0, 10),
            court("Grande Quadra Society", "Centro", 120.0, 22),
            court("Quadra Pequena 7v7", "Bairro Y", 80.0, 14),
        ];

        let search = CourtFilters::parse(Some("central"), None, None).unwrap();
        let hits: Vec<_> = courts.iter().filter(|c| search.matches(c)).map(|c| c.name.as_str()).collect();
        assert_eq!(hits, vec!["Quadra Central"]);

        let by_location = CourtFilters::parse(Some("CENTRO"), None, None).unwrap();
        assert_eq!(courts.iter().filter(|c| by_location.matches(c)).count(), 2);

        let combined = CourtFilters::parse(Some("Quadra"), Some("0-50"), Some("10")).unwrap();
        let hits: Vec<_> = courts.iter().filter(|c| combined.matches(c)).map(|c| c.name.as_str()).collect();
        assert_eq!(hits, vec!["Quadra Bairro Novo"]);
    }

    #[test]
    fn capacity_is_exact_match() {
        let f = CourtFilters::parse(None, None, Some("10")).unwrap();
        assert!(f.matches(&court("A court", "Somewhere", 10.0, 10)));
        assert!(!f.matches(&court("A court", "Somewhere", 10.0, 14)));
        assert!(!f.matches(&court("A court", "Somewhere", 10.0, 8)));
        assert!(CourtFilters::parse(None, None, Some("ten")).is_err());
    }

    #[test]
    fn patch_validation() {
        let ok = CourtPatch {
            name: "  Arena  ".into(),
            location: "Rua XV, 100".into(),
            price_per_hour: 90.0,
            max_players: 10,
            image_url: Some("".into()),
        }
        .validated()
        .unwrap();
        assert_eq!(ok.name, "Arena");
        assert_eq!(ok.image_url, None);

        for bad in ["not a url", "http://[", "https://exa%mple", "http://a:b:c:d", "ftp://files.test/a.png", "https://"] {
            let bad_url = CourtPatch { image_url: Some(bad.into()), ..ok.clone() };
            assert!(bad_url.validated().is_err(), "accepted {bad}");
        }

        let good_url = CourtPatch { image_url: Some(" https://img.test/quadra.png?v=2 ".into()), ..ok.clone() };
        assert_eq!(good_url.validated().unwrap().image_url.as_deref(), Some("https://img.test/quadra.png?v=2"));

        let bad_price = CourtPatch { price_per_hour: 0.0, ..ok.clone() };
        assert!(bad_price.validated().is_err());

        let short_name = CourtPatch { name: "AB".into(), ..ok };
        assert!(short_name.validated().is_err());
    }
}
