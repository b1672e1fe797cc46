use super::license::LicenseClass;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Unit fee per license class, maintained by the administrator.
///
/// Reads never fail: a class without an entry costs `0`, and a negative entry
/// is treated as `0`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeeTable(BTreeMap<LicenseClass, Decimal>);

impl FeeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Published price list the dashboard shipped with.
    pub fn reference() -> Self {
        [
            (LicenseClass::B, 15_000),
            (LicenseClass::A1, 12_000),
            (LicenseClass::A2, 12_000),
            (LicenseClass::C, 15_000),
            (LicenseClass::D, 15_000),
            (LicenseClass::FarkA1, 10_000),
            (LicenseClass::FarkA2, 12_000),
            (LicenseClass::BakanlikA1, 7_500),
        ]
        .into_iter()
        .map(|(class, fee)| (class, Decimal::from(fee)))
        .collect()
    }

    pub fn fee(&self, class: LicenseClass) -> Decimal {
        self.0
            .get(&class)
            .copied()
            .map(clamp_fee)
            .unwrap_or(Decimal::ZERO)
    }

    pub fn with(mut self, class: LicenseClass, fee: Decimal) -> Self {
        self.set(class, fee);
        self
    }

    pub fn set(&mut self, class: LicenseClass, fee: Decimal) {
        self.0.insert(class, clamp_fee(fee));
    }

    /// Copy of the table with negative entries replaced by zero.
    pub fn normalized(&self) -> Self {
        self.0
            .iter()
            .map(|(class, fee)| (*class, clamp_fee(*fee)))
            .collect()
    }

    /// Copy of the table with `updates` laid over it; classes absent from
    /// `updates` keep their current fee.
    pub fn merged(&self, updates: &FeeTable) -> Self {
        let mut merged = self.clone();
        for (class, fee) in updates.iter() {
            merged.set(class, fee);
        }
        merged
    }

    pub fn iter(&self) -> impl Iterator<Item = (LicenseClass, Decimal)> + '_ {
        self.0.iter().map(|(class, fee)| (*class, *fee))
    }
}

impl FromIterator<(LicenseClass, Decimal)> for FeeTable {
    fn from_iter<T: IntoIterator<Item = (LicenseClass, Decimal)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

fn clamp_fee(fee: Decimal) -> Decimal {
    fee.max(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_and_negative_fees_read_as_zero() {
        let mut table = FeeTable::new();
        assert_eq!(table.fee(LicenseClass::B), Decimal::ZERO);

        table.set(LicenseClass::C, Decimal::from(-250));
        assert_eq!(table.fee(LicenseClass::C), Decimal::ZERO);
    }

    #[test]
    fn deserialized_negatives_are_normalized() {
        let table: FeeTable =
            serde_json::from_str(r#"{"B": 15000, "A1": -5}"#).expect("fee table parses");
        assert_eq!(table.fee(LicenseClass::A1), Decimal::ZERO);

        let normalized = table.normalized();
        assert!(normalized.iter().all(|(_, fee)| fee >= Decimal::ZERO));
        assert_eq!(normalized.fee(LicenseClass::B), Decimal::from(15_000));
    }

    #[test]
    fn reference_table_prices_every_class() {
        let table = FeeTable::reference();
        assert_eq!(table.iter().count(), LicenseClass::COUNT);
        assert_eq!(table.fee(LicenseClass::BakanlikA1), Decimal::from(7_500));
    }
}
