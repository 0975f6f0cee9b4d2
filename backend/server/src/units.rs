//! # Units
//!
//! Each unit document in the `units` collection carries its bonus
//! parameters. This server only reads them, the admin console owns writes.
//!
//! ```text
//! units/{unitId}
//!   name: string
//!   bonusParameters:
//!     minWithdrawal: number
//!     defaultCashback: number
//!     defaultCommission: number
//!     products:
//!       auto | consortium | corporate | life:
//!         cashback: number
//!         commission: number
//! ```
//!
//! Every field may be missing, null or of the wrong type. A field that does
//! not decode reads as unset without failing the rest of the document. The
//! minimum withdrawal falls back to [`DEFAULT_MIN_WITHDRAWAL`] whenever it
//! cannot be read.

use std::future::Future;

use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::{error, warn};

use crate::{
    error::FirebaseError,
    firebase::{FirebaseAdmin, decode_document},
};

pub const UNITS_COLLECTION: &str = "units";
pub const DEFAULT_MIN_WITHDRAWAL: f64 = 700.0;

/// Decodes a field, replacing anything that does not fit with the default.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;

    Ok(serde_json::from_value(value).unwrap_or_default())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Product {
    Auto,
    Consortium,
    Corporate,
    Life,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRates {
    #[serde(default, deserialize_with = "lenient")]
    pub cashback: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub commission: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductOverrides {
    #[serde(default, deserialize_with = "lenient")]
    pub auto: ProductRates,
    #[serde(default, deserialize_with = "lenient")]
    pub consortium: ProductRates,
    #[serde(default, deserialize_with = "lenient")]
    pub corporate: ProductRates,
    #[serde(default, deserialize_with = "lenient")]
    pub life: ProductRates,
}

impl ProductOverrides {
    pub fn get(&self, product: Product) -> &ProductRates {
        match product {
            Product::Auto => &self.auto,
            Product::Consortium => &self.consortium,
            Product::Corporate => &self.corporate,
            Product::Life => &self.life,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BonusParameters {
    #[serde(default, deserialize_with = "lenient")]
    pub min_withdrawal: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub default_cashback: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub default_commission: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub products: ProductOverrides,
}

impl BonusParameters {
    pub fn cashback_for(&self, product: Product) -> Option<f64> {
        self.products.get(product).cashback.or(self.default_cashback)
    }

    pub fn commission_for(&self, product: Product) -> Option<f64> {
        self.products
            .get(product)
            .commission
            .or(self.default_commission)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    #[serde(default, deserialize_with = "lenient")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub bonus_parameters: BonusParameters,
}

pub trait UnitStore {
    /// `Ok(None)` when no document exists for `unit_id`.
    fn unit(
        &self,
        unit_id: &str,
    ) -> impl Future<Output = Result<Option<Unit>, FirebaseError>> + Send;
}

impl UnitStore for FirebaseAdmin {
    async fn unit(&self, unit_id: &str) -> Result<Option<Unit>, FirebaseError> {
        let url = self.document_url(&[UNITS_COLLECTION, unit_id])?;

        let Some(document) = self.get_json(url).await? else {
            return Ok(None);
        };

        Ok(Some(Unit::from_document(unit_id, &document)?))
    }
}

impl Unit {
    pub fn from_document(unit_id: &str, document: &Value) -> Result<Self, FirebaseError> {
        let mut unit: Unit = serde_json::from_value(decode_document(document))?;
        unit.id = unit_id.to_string();

        Ok(unit)
    }
}

pub async fn get_unit<S: UnitStore>(store: &S, unit_id: &str) -> Result<Option<Unit>, FirebaseError> {
    store.unit(unit_id).await.map_err(|e| {
        error!("Failed to read unit {unit_id}: {e}");
        e
    })
}

pub async fn min_withdrawal<S: UnitStore>(store: &S, unit_id: &str) -> f64 {
    match store.unit(unit_id).await {
        Ok(Some(unit)) => unit
            .bonus_parameters
            .min_withdrawal
            .unwrap_or_else(|| {
                warn!("Unit {unit_id} has no minWithdrawal, using {DEFAULT_MIN_WITHDRAWAL}");
                DEFAULT_MIN_WITHDRAWAL
            }),
        Ok(None) => {
            warn!("Unit {unit_id} not found, using {DEFAULT_MIN_WITHDRAWAL}");
            DEFAULT_MIN_WITHDRAWAL
        }
        Err(e) => {
            error!("Failed to read minWithdrawal for unit {unit_id}: {e}");
            DEFAULT_MIN_WITHDRAWAL
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serde_json::json;

    use super::{
        BonusParameters, DEFAULT_MIN_WITHDRAWAL, Product, Unit, UnitStore, get_unit,
        min_withdrawal,
    };
    use crate::{error::FirebaseError, firebase::decode_document};

    #[derive(Default)]
    struct MemoryUnits {
        units: HashMap<String, Unit>,
        broken: bool,
    }

    impl MemoryUnits {
        fn with(unit: Unit) -> Self {
            let mut units = HashMap::new();
            units.insert(unit.id.clone(), unit);

            Self {
                units,
                broken: false,
            }
        }
    }

    impl UnitStore for MemoryUnits {
        async fn unit(&self, unit_id: &str) -> Result<Option<Unit>, FirebaseError> {
            if self.broken {
                return Err(FirebaseError::MissingToken);
            }

            Ok(self.units.get(unit_id).cloned())
        }
    }

    fn unit_with_min(min: Option<f64>) -> Unit {
        Unit {
            id: "centro".to_string(),
            name: Some("Unidade Centro".to_string()),
            bonus_parameters: BonusParameters {
                min_withdrawal: min,
                ..Default::default()
            },
        }
    }

    #[tokio::test]
    async fn test_min_withdrawal_present() {
        let store = MemoryUnits::with(unit_with_min(Some(250.5)));

        assert_eq!(min_withdrawal(&store, "centro").await, 250.5);
    }

    #[tokio::test]
    async fn test_min_withdrawal_zero_is_kept() {
        let store = MemoryUnits::with(unit_with_min(Some(0.0)));

        assert_eq!(min_withdrawal(&store, "centro").await, 0.0);
    }

    #[tokio::test]
    async fn test_min_withdrawal_fallbacks() {
        let missing_field = MemoryUnits::with(unit_with_min(None));
        assert_eq!(min_withdrawal(&missing_field, "centro").await, DEFAULT_MIN_WITHDRAWAL);

        let missing_unit = MemoryUnits::default();
        assert_eq!(min_withdrawal(&missing_unit, "centro").await, 700.0);

        let broken = MemoryUnits {
            broken: true,
            ..Default::default()
        };
        assert_eq!(min_withdrawal(&broken, "centro").await, 700.0);
    }

    #[tokio::test]
    async fn test_get_unit_propagates_errors() {
        let broken = MemoryUnits {
            broken: true,
            ..Default::default()
        };
        assert!(get_unit(&broken, "centro").await.is_err());

        let store = MemoryUnits::with(unit_with_min(Some(100.0)));
        assert!(get_unit(&store, "centro").await.unwrap().is_some());
        assert!(get_unit(&store, "norte").await.unwrap().is_none());
    }

    #[test]
    fn test_null_products_keep_min_withdrawal() {
        let document = json!({
            "fields": {
                "bonusParameters": {"mapValue": {"fields": {
                    "minWithdrawal": {"integerValue": "500"},
                    "products": {"nullValue": null}
                }}}
            }
        });

        let unit = Unit::from_document("centro", &document).unwrap();

        assert_eq!(unit.id, "centro");
        assert_eq!(unit.bonus_parameters.min_withdrawal, Some(500.0));
        assert_eq!(unit.bonus_parameters.cashback_for(Product::Auto), None);
    }

    #[test]
    fn test_mistyped_fields_read_as_unset() {
        let document = json!({
            "fields": {
                "name": {"integerValue": "7"},
                "bonusParameters": {"mapValue": {"fields": {
                    "minWithdrawal": {"integerValue": "500"},
                    "defaultCashback": {"stringValue": "0.3"},
                    "products": {"mapValue": {"fields": {
                        "auto": {"mapValue": {"fields": {
                            "cashback": {"stringValue": "alto"},
                            "commission": {"doubleValue": 0.02}
                        }}},
                        "life": {"stringValue": "n/a"}
                    }}}
                }}}
            }
        });

        let unit = Unit::from_document("centro", &document).unwrap();

        assert_eq!(unit.name, None);
        assert_eq!(unit.bonus_parameters.min_withdrawal, Some(500.0));
        assert_eq!(unit.bonus_parameters.default_cashback, None);
        assert_eq!(unit.bonus_parameters.cashback_for(Product::Auto), None);
        assert_eq!(unit.bonus_parameters.commission_for(Product::Auto), Some(0.02));
        assert_eq!(unit.bonus_parameters.commission_for(Product::Life), None);
    }

    #[tokio::test]
    async fn test_min_withdrawal_from_messy_document() {
        let document = json!({
            "fields": {
                "name": {"integerValue": "7"},
                "bonusParameters": {"mapValue": {"fields": {
                    "minWithdrawal": {"doubleValue": 512.5},
                    "products": {"nullValue": null}
                }}}
            }
        });
        let store = MemoryUnits::with(Unit::from_document("centro", &document).unwrap());

        assert_eq!(min_withdrawal(&store, "centro").await, 512.5);
    }

    #[test]
    fn test_product_rates_fall_back_to_defaults() {
        let parameters: BonusParameters = serde_json::from_value(json!({
            "defaultCashback": 0.3,
            "defaultCommission": 0.1,
            "products": {
                "auto": {"cashback": 0.5},
                "life": {"commission": 0.2}
            }
        }))
        .unwrap();

        assert_eq!(parameters.cashback_for(Product::Auto), Some(0.5));
        assert_eq!(parameters.commission_for(Product::Auto), Some(0.1));
        assert_eq!(parameters.cashback_for(Product::Life), Some(0.3));
        assert_eq!(parameters.commission_for(Product::Life), Some(0.2));
        assert_eq!(parameters.cashback_for(Product::Corporate), Some(0.3));
        assert_eq!(parameters.min_withdrawal, None);
    }

    #[test]
    fn test_unit_from_firestore_document() {
        let document = json!({
            "fields": {
                "name": {"stringValue": "Unidade Sul"},
                "bonusParameters": {"mapValue": {"fields": {
                    "minWithdrawal": {"integerValue": "1000"},
                    "defaultCashback": {"doubleValue": 0.25},
                    "products": {"mapValue": {"fields": {
                        "consortium": {"mapValue": {"fields": {"commission": {"doubleValue": 0.04}}}}
                    }}}
                }}}
            }
        });

        let unit: Unit = serde_json::from_value(decode_document(&document)).unwrap();

        assert_eq!(unit.name.as_deref(), Some("Unidade Sul"));
        assert_eq!(unit.bonus_parameters.min_withdrawal, Some(1000.0));
        assert_eq!(unit.bonus_parameters.cashback_for(Product::Consortium), Some(0.25));
        assert_eq!(unit.bonus_parameters.commission_for(Product::Consortium), Some(0.04));
    }
}
