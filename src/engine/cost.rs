use thiserror::Error;

use crate::models::parcel::{DeliveryType, Dimensions};

const BASE_RATE: f64 = 5.99;
const WEIGHT_RATE_PER_KG: f64 = 2.5;
const VOLUME_RATE_PER_LITRE: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QuoteError {
    #[error("weight must be greater than zero")]
    NonPositiveWeight,

    #[error("every dimension must be greater than zero")]
    NonPositiveDimension,
}

pub fn estimate_cost(
    weight_kg: f64,
    dimensions: Dimensions,
    delivery_type: DeliveryType,
) -> Result<f64, QuoteError> {
    if !weight_kg.is_finite() || weight_kg <= 0.0 {
        return Err(QuoteError::NonPositiveWeight);
    }

    for side in [dimensions.length, dimensions.width, dimensions.height] {
        if !side.is_finite() || side <= 0.0 {
            return Err(QuoteError::NonPositiveDimension);
        }
    }

    let weight_cost = weight_kg * WEIGHT_RATE_PER_KG;
    let volume_litres = dimensions.length * dimensions.width * dimensions.height / 1000.0;
    let volume_cost = volume_litres * VOLUME_RATE_PER_LITRE;

    Ok(round2(
        (BASE_RATE + weight_cost + volume_cost) * delivery_multiplier(delivery_type),
    ))
}

pub fn round2(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

fn delivery_multiplier(delivery_type: DeliveryType) -> f64 {
    match delivery_type {
        DeliveryType::Standard => 1.0,
        DeliveryType::Express => 2.0,
        DeliveryType::SameDay => 3.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dims(length: f64, width: f64, height: f64) -> Dimensions {
        Dimensions {
            length,
            width,
            height,
        }
    }

    #[test]
    fn standard_two_kg_small_box_costs_11_49() {
        let cost = estimate_cost(2.0, dims(10.0, 10.0, 10.0), DeliveryType::Standard).unwrap();
        assert_eq!(cost, 11.49);
    }

    #[test]
    fn express_doubles_the_base_quote() {
        let cost = estimate_cost(1.0, dims(20.0, 20.0, 20.0), DeliveryType::Express).unwrap();
        assert_eq!(cost, 24.98);
    }

    #[test]
    fn same_day_triples_the_base_quote() {
        let cost = estimate_cost(2.0, dims(10.0, 10.0, 10.0), DeliveryType::SameDay).unwrap();
        assert_eq!(cost, 34.47);
    }

    #[test]
    fn identical_inputs_quote_identically() {
        let first = estimate_cost(3.3, dims(12.0, 8.0, 30.0), DeliveryType::Express).unwrap();
        let second = estimate_cost(3.3, dims(12.0, 8.0, 30.0), DeliveryType::Express).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn rejects_non_positive_weight() {
        for weight in [0.0, -1.5, f64::NAN] {
            assert_eq!(
                estimate_cost(weight, dims(10.0, 10.0, 10.0), DeliveryType::Standard),
                Err(QuoteError::NonPositiveWeight)
            );
        }
    }

    #[test]
    fn rejects_non_positive_dimensions() {
        assert_eq!(
            estimate_cost(1.0, dims(0.0, 10.0, 10.0), DeliveryType::Standard),
            Err(QuoteError::NonPositiveDimension)
        );
        assert_eq!(
            estimate_cost(1.0, dims(10.0, -2.0, 10.0), DeliveryType::Standard),
            Err(QuoteError::NonPositiveDimension)
        );
        assert_eq!(
            estimate_cost(1.0, dims(10.0, 10.0, f64::INFINITY), DeliveryType::Standard),
            Err(QuoteError::NonPositiveDimension)
        );
    }

    #[test]
    fn round2_rounds_half_up_on_the_cent() {
        assert_eq!(round2(0.125), 0.13);
        assert_eq!(round2(4.375), 4.38);
        assert_eq!(round2(11.494), 11.49);
    }
}
