use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::schema::{Checker, Validate, ValidationError};

/// Cities a movie can be shown in.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
pub enum Location {
    #[serde(rename = "MSK")]
    #[strum(serialize = "MSK")]
    Msk,
    #[serde(rename = "SPB")]
    #[strum(serialize = "SPB")]
    Spb,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Body of `POST /movies`. Prices are whole rubles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieData {
    pub name: String,
    pub description: String,
    pub price: i64,
    pub genre_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
}

impl Validate for MovieData {
    fn validate(&self) -> Result<(), ValidationError> {
        Checker::new("MovieData")
            .length("name", &self.name, 1, Some(255))
            .length("description", &self.description, 1, None)
            .range("price", self.price, Some(0), None)
            .range("genreId", self.genre_id, Some(1), None)
            .opt_range("rating", self.rating, Some(0.0), Some(10.0))
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: i64,
    pub genre_id: i64,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub published: Option<bool>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Movie {
    /// Whether the server stored what was sent. Rating and timestamps are
    /// server-owned and not compared.
    pub fn matches(&self, data: &MovieData) -> bool {
        self.name == data.name
            && self.description == data.description
            && self.price == data.price
            && self.genre_id == data.genre_id
            && data.location.is_none_or(|l| self.location == Some(l))
            && data.published.is_none_or(|p| self.published == Some(p))
    }
}

impl Validate for Movie {
    fn validate(&self) -> Result<(), ValidationError> {
        Checker::new("Movie")
            .range("id", self.id, Some(1), None)
            .length("name", &self.name, 1, Some(255))
            .length("description", &self.description, 1, None)
            .range("price", self.price, Some(0), None)
            .range("genreId", self.genre_id, Some(1), None)
            .opt_range("rating", self.rating, Some(0.0), Some(10.0))
            .iso8601("createdAt", self.created_at.as_deref())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoviesPage {
    pub movies: Vec<Movie>,
    #[serde(default)]
    pub count: Option<i64>,
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub page_size: Option<i64>,
    #[serde(default)]
    pub page_count: Option<i64>,
}

impl Validate for MoviesPage {
    fn validate(&self) -> Result<(), ValidationError> {
        self.movies
            .iter()
            .fold(Checker::new("MoviesPage"), |checker, movie| checker.nested(movie))
            .opt_range("count", self.count, Some(0), None)
            .opt_range("page", self.page, Some(1), None)
            .opt_range("pageSize", self.page_size, Some(1), None)
            .finish()
    }
}

/// Query of `GET /movies`. Unset filters are not sent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovieFilter {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub locations: Vec<Location>,
    pub published: Option<bool>,
    pub genre_id: Option<i64>,
    pub order: Option<SortOrder>,
    pub created_at: Option<String>,
}

impl MovieFilter {
    pub fn page(page: u32, page_size: u32) -> MovieFilter {
        MovieFilter {
            page: Some(page),
            page_size: Some(page_size),
            ..Default::default()
        }
    }

    /// Key/value pairs in wire order; each location becomes its own
    /// `locations` key.
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        let mut push = |key: &'static str, value: Option<String>| {
            if let Some(value) = value {
                pairs.push((key, value));
            }
        };
        push("page", self.page.map(|v| v.to_string()));
        push("pageSize", self.page_size.map(|v| v.to_string()));
        push("minPrice", self.min_price.map(|v| v.to_string()));
        push("maxPrice", self.max_price.map(|v| v.to_string()));
        for location in &self.locations {
            push("locations", Some(location.to_string()));
        }
        push("published", self.published.map(|v| v.to_string()));
        push("genreId", self.genre_id.map(|v| v.to_string()));
        push("order", self.order.map(|v| v.to_string()));
        push("createdAt", self.created_at.clone());
        pairs
    }
}

impl Validate for MovieFilter {
    fn validate(&self) -> Result<(), ValidationError> {
        let price_order = match (self.min_price, self.max_price) {
            (Some(min), Some(max)) => min <= max,
            _ => true,
        };
        Checker::new("MovieFilter")
            .opt_range("page", self.page, Some(1), None)
            .opt_range("pageSize", self.page_size, Some(1), Some(100))
            .opt_range("minPrice", self.min_price, Some(0), None)
            .opt_range("maxPrice", self.max_price, Some(0), None)
            .opt_range("genreId", self.genre_id, Some(1), None)
            .rule("maxPrice", price_order, "minPrice is greater than maxPrice")
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn movie_data() -> MovieData {
        MovieData {
            name: "Тестовое кино".into(),
            description: "Описание".into(),
            price: 250,
            genre_id: 3,
            image_url: None,
            location: Some(Location::Spb),
            published: Some(true),
            rating: None,
        }
    }

    #[test]
    fn movie_data_omits_unset_fields() {
        let body = serde_json::to_value(movie_data()).unwrap();
        assert_eq!(
            body,
            json!({
                "name": "Тестовое кино",
                "description": "Описание",
                "price": 250,
                "genreId": 3,
                "location": "SPB",
                "published": true
            })
        );
    }

    #[test]
    fn partial_movie_data_reads_back_unchanged() -> eyre::Result<()> {
        let data = MovieData {
            published: None,
            ..movie_data()
        };
        let body = serde_json::to_string(&data)?;
        assert!(!body.contains("published"));
        assert!(!body.contains("imageUrl"));
        assert_eq!(serde_json::from_str::<MovieData>(&body)?, data);
        Ok(())
    }

    #[test]
    fn negative_price_and_zero_genre_are_violations() {
        let data = MovieData {
            price: -1,
            genre_id: 0,
            ..movie_data()
        };
        assert_eq!(data.validate().unwrap_err().fields(), vec!["price", "genreId"]);
    }

    #[test]
    fn created_movie_matches_request() -> eyre::Result<()> {
        let movie: Movie = serde_json::from_value(json!({
            "id": 101,
            "name": "Тестовое кино",
            "description": "Описание",
            "price": 250,
            "genreId": 3,
            "location": "SPB",
            "published": true,
            "rating": 0,
            "createdAt": "2025-03-08T12:00:00.000Z",
            "genre": {"name": "Драма"}
        }))?;
        movie.validate()?;
        assert!(movie.matches(&movie_data()));
        assert!(!movie.matches(&MovieData {
            price: 300,
            ..movie_data()
        }));
        Ok(())
    }

    #[test]
    fn filter_pairs_repeat_locations() {
        let filter = MovieFilter {
            page_size: Some(5),
            locations: vec![Location::Msk, Location::Spb],
            order: Some(SortOrder::Desc),
            ..Default::default()
        };
        assert_eq!(
            filter.pairs(),
            vec![
                ("pageSize", "5".to_string()),
                ("locations", "MSK".to_string()),
                ("locations", "SPB".to_string()),
                ("order", "DESC".to_string()),
            ]
        );
        assert!(MovieFilter::default().pairs().is_empty());
    }

    #[test]
    fn filter_rejects_inverted_price_range() {
        let filter = MovieFilter {
            min_price: Some(500),
            max_price: Some(100),
            ..Default::default()
        };
        assert_eq!(filter.validate().unwrap_err().fields(), vec!["maxPrice"]);
    }

    #[test]
    fn filter_rejects_oversized_page() {
        let err = MovieFilter::page(0, 101).validate().unwrap_err();
        assert_eq!(err.fields(), vec!["page", "pageSize"]);
    }
}
