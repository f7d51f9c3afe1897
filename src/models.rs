// src/models.rs
use serde::{Serialize, Serializer};

/// Literal written in place of any value that could not be obtained.
pub const NOT_AVAILABLE: &str = "N/A";

/// A single datum in a response record.
///
/// Missing provider data, a zero divisor or a failed enrichment all end up as
/// `Unavailable`, which serializes to `"N/A"`.
#[derive(Debug, Clone, PartialEq)]
pub enum Field<T> {
    Present(T),
    Unavailable,
}

impl<T> Field<T> {
    pub fn is_present(&self) -> bool {
        matches!(self, Field::Present(_))
    }
}

impl<T> From<Option<T>> for Field<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Field::Present(v),
            None => Field::Unavailable,
        }
    }
}

impl<T: Serialize> Serialize for Field<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Field::Present(v) => v.serialize(serializer),
            Field::Unavailable => serializer.serialize_str(NOT_AVAILABLE),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRecord {
    #[serde(skip)]
    pub ticker: String,
    pub company_name: Field<String>,
    pub current_price: Field<f64>,
    // Used for the percent change; not part of the response body.
    #[serde(skip)]
    pub open_price: Field<f64>,
    pub percent_change: Field<f64>,
    pub last_updated: Field<String>,
    pub fetch_time: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FundamentalsRecord {
    #[serde(skip)]
    pub ticker: String,
    pub market_cap: Field<f64>,
    pub enterprise_value: Field<f64>,
    #[serde(rename = "trailingPE")]
    pub trailing_pe: Field<f64>,
    #[serde(rename = "forwardPE")]
    pub forward_pe: Field<f64>,
    pub peg_ratio: Field<f64>,
    pub ps_ratio: Field<f64>,
    pub pb_ratio: Field<f64>,
    pub enterprise_value_revenue: Field<f64>,
    pub enterprise_value_ebitda: Field<f64>,
    pub short_selling: Field<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unavailable_serializes_as_sentinel() {
        let record = QuoteRecord {
            ticker: "ERIC-B.ST".to_string(),
            company_name: Field::Present("Telefonaktiebolaget LM Ericsson (publ)".to_string()),
            current_price: Field::Present(61.5),
            open_price: Field::Unavailable,
            percent_change: Field::Unavailable,
            last_updated: Field::Unavailable,
            fetch_time: "2024-05-02 10:15:00".to_string(),
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            json!({
                "companyName": "Telefonaktiebolaget LM Ericsson (publ)",
                "currentPrice": 61.5,
                "percentChange": "N/A",
                "lastUpdated": "N/A",
                "fetchTime": "2024-05-02 10:15:00",
            })
        );
    }

    #[test]
    fn fundamentals_use_frontend_field_names() {
        let record = FundamentalsRecord {
            ticker: "SBB-B.ST".to_string(),
            market_cap: Field::Present(1.0),
            enterprise_value: Field::Unavailable,
            trailing_pe: Field::Present(2.0),
            forward_pe: Field::Present(3.0),
            peg_ratio: Field::Unavailable,
            ps_ratio: Field::Present(4.0),
            pb_ratio: Field::Present(5.0),
            enterprise_value_revenue: Field::Present(6.0),
            enterprise_value_ebitda: Field::Present(7.0),
            short_selling: Field::Present("1,23 %".to_string()),
        };

        let value = serde_json::to_value(&record).unwrap();
        let keys: Vec<&str> = value.as_object().unwrap().keys().map(|k| k.as_str()).collect();
        assert_eq!(keys.len(), 10);
        assert_eq!(value["trailingPE"], json!(2.0));
        assert_eq!(value["forwardPE"], json!(3.0));
        assert_eq!(value["enterpriseValue"], json!("N/A"));
        assert_eq!(value["pegRatio"], json!("N/A"));
        assert_eq!(value["enterpriseValueEbitda"], json!(7.0));
        assert_eq!(value["shortSelling"], json!("1,23 %"));
    }

    #[test]
    fn option_converts_to_field() {
        assert_eq!(Field::from(Some(2.5)), Field::Present(2.5));
        assert_eq!(Field::<f64>::from(None), Field::Unavailable);
        assert!(!Field::<f64>::Unavailable.is_present());
    }
}
