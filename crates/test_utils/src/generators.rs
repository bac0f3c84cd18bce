//! Property-Based Test Generators
//!
//! Proptest strategies for the raw reference shapes, and `fake`-backed
//! random load fields.

use fake::faker::address::en::CityName;
use fake::Fake;
use proptest::prelude::*;
use rust_decimal::Decimal;

use domain_loads::{LengthUnit, LoadFields, WeightUnit};

/// Strategy for strings of exactly `len` hex digits in mixed case
pub fn hex_string_strategy(len: usize) -> impl Strategy<Value = String> {
    proptest::collection::vec(
        prop_oneof![
            proptest::char::range('0', '9'),
            proptest::char::range('a', 'f'),
            proptest::char::range('A', 'F'),
        ],
        len,
    )
    .prop_map(|chars| chars.into_iter().collect())
}

/// Strategy for canonical references
pub fn canonical_reference_strategy() -> impl Strategy<Value = String> {
    hex_string_strategy(32).prop_map(|hex| {
        format!(
            "{}-{}-{}-{}-{}",
            &hex[0..8],
            &hex[8..12],
            &hex[12..16],
            &hex[16..20],
            &hex[20..32]
        )
    })
}

/// Strategy for any accepted raw form, paired with the canonical reference
/// it must resolve to
pub fn raw_reference_strategy() -> impl Strategy<Value = (String, String)> {
    (hex_string_strategy(32), 0u8..4).prop_map(|(hex, shape)| {
        let canonical = format!(
            "{}-{}-{}-{}-{}",
            &hex[0..8],
            &hex[8..12],
            &hex[12..16],
            &hex[16..20],
            &hex[20..32]
        );
        let raw = match shape {
            0 => canonical.clone(),
            1 => hex.clone(),
            2 => format!("https://blobs.test/upload?token={}&exp=60", canonical),
            _ => format!("https://blobs.test/upload/{}?sig=x", hex),
        };
        (raw, canonical)
    })
}

/// A random Indian mobile number in `+91 XXXXXXXXXX` form
pub fn fake_phone_number() -> String {
    let number: u64 = (6_000_000_000u64..9_999_999_999u64).fake();
    format!("+91 {}", number)
}

/// Random but valid load fields
pub fn fake_load_fields() -> LoadFields {
    let metric: bool = fake::Faker.fake();
    LoadFields {
        current_location: CityName().fake(),
        destination_location: CityName().fake(),
        weight: Decimal::new((1_000i64..40_000i64).fake(), 3),
        weight_unit: if metric { WeightUnit::Kg } else { WeightUnit::Ton },
        truck_length: Decimal::new((10i64..60i64).fake(), 0),
        length_unit: if metric { LengthUnit::M } else { LengthUnit::Ft },
        contact_number: fake_phone_number(),
        staff_contact_number: fake_phone_number(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn canonical_strategy_is_canonical(reference in canonical_reference_strategy()) {
            prop_assert!(core_kernel::is_canonical(&reference));
        }
    }

    #[test]
    fn test_fake_load_fields_are_valid() {
        for _ in 0..50 {
            let fields = fake_load_fields();
            assert!(fields.check().is_ok(), "{:?}", fields);
        }
    }
}
