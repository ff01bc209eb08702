//! Validation utilities for Krishak Mitra
//!
//! Includes India-specific checks for phone numbers and soil health card values.

use rust_decimal::Decimal;

use crate::models::SoilHealthCard;

// ============================================================================
// Account Validations
// ============================================================================

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters");
    }
    Ok(())
}

/// Validate an international phone number: optional '+', then 10-15 digits.
/// Spaces and dashes are ignored.
pub fn validate_phone(phone: &str) -> Result<(), &'static str> {
    let trimmed = phone.trim();
    let body = trimmed.strip_prefix('+').unwrap_or(trimmed);
    if body.chars().any(|c| !(c.is_ascii_digit() || c == ' ' || c == '-')) {
        return Err("Phone number may only contain digits, spaces and dashes");
    }
    let digits = body.chars().filter(|c| c.is_ascii_digit()).count();
    if !(10..=15).contains(&digits) {
        return Err("Phone number must have 10 to 15 digits");
    }
    Ok(())
}

/// Normalise a phone number to E.164. Bare 10 digit Indian mobile numbers
/// get the +91 country code.
pub fn normalize_phone(phone: &str) -> String {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    if phone.trim().starts_with('+') {
        format!("+{}", digits)
    } else if digits.len() == 10 {
        format!("+91{}", digits)
    } else {
        format!("+{}", digits)
    }
}

/// Validate a non-blank display or record name
pub fn validate_name(name: &str) -> Result<(), &'static str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Name cannot be empty");
    }
    if trimmed.chars().count() > 100 {
        return Err("Name cannot exceed 100 characters");
    }
    Ok(())
}

// ============================================================================
// Farm and Market Validations
// ============================================================================

/// Validate a farm's land area
pub fn validate_farm_size(size: Decimal) -> Result<(), &'static str> {
    if size <= Decimal::ZERO {
        return Err("Farm size must be greater than zero");
    }
    if size > Decimal::from(100_000) {
        return Err("Farm size is unrealistically large");
    }
    Ok(())
}

/// Validate a price alert threshold (Rs per quintal)
pub fn validate_price_threshold(threshold: Decimal) -> Result<(), &'static str> {
    if threshold <= Decimal::ZERO {
        return Err("Price threshold must be greater than zero");
    }
    Ok(())
}

/// Validate soil health card readings are physically plausible
pub fn validate_soil_health_card(card: &SoilHealthCard) -> Result<(), &'static str> {
    if card.ph < Decimal::ZERO || card.ph > Decimal::from(14) {
        return Err("Soil pH must be between 0 and 14");
    }
    if card.organic_carbon < Decimal::ZERO || card.organic_carbon > Decimal::from(100) {
        return Err("Organic carbon must be between 0 and 100%");
    }
    if card.nitrogen < Decimal::ZERO || card.phosphorus < Decimal::ZERO || card.potassium < Decimal::ZERO {
        return Err("Nutrient levels cannot be negative");
    }
    Ok(())
}

// ============================================================================
// Media Validations
// ============================================================================

/// Image MIME types accepted for uploads
pub const ACCEPTED_IMAGE_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/webp", "image/heic"];

/// Split "data:<mime>;base64,<payload>" into MIME type and base64 payload
pub fn parse_image_data_uri(uri: &str) -> Result<(&str, &str), &'static str> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or("Image must be a data URI")?;
    let (meta, payload) = rest.split_once(',').ok_or("Data URI has no payload")?;
    let mime = meta
        .strip_suffix(";base64")
        .ok_or("Data URI must be base64 encoded")?;
    if !ACCEPTED_IMAGE_TYPES.contains(&mime) {
        return Err("Unsupported image type");
    }
    if payload.is_empty() {
        return Err("Data URI has no payload");
    }
    Ok((mime, payload))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_validate_phone_formats() {
        assert!(validate_phone("+91 98765 43210").is_ok());
        assert!(validate_phone("9876543210").is_ok());
        assert!(validate_phone("98765-43210").is_ok());
        assert!(validate_phone("12345").is_err());
        assert!(validate_phone("+91 98765x43210").is_err());
    }

    #[test]
    fn test_normalize_phone() {
        assert_eq!(normalize_phone("98765 43210"), "+919876543210");
        assert_eq!(normalize_phone("+91-98765-43210"), "+919876543210");
        assert_eq!(normalize_phone("919876543210"), "+919876543210");
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("kisan123").is_ok());
        assert!(validate_password("short").is_err());
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Ramesh Patil").is_ok());
        assert!(validate_name("   ").is_err());
        assert!(validate_name(&"a".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_farm_size() {
        assert!(validate_farm_size(Decimal::new(25, 1)).is_ok());
        assert!(validate_farm_size(Decimal::ZERO).is_err());
        assert!(validate_farm_size(Decimal::from(-1)).is_err());
    }

    #[test]
    fn test_validate_price_threshold() {
        assert!(validate_price_threshold(Decimal::from(2500)).is_ok());
        assert!(validate_price_threshold(Decimal::ZERO).is_err());
    }

    #[test]
    fn test_validate_soil_health_card() {
        let mut card = SoilHealthCard {
            ph: Decimal::new(72, 1),
            organic_carbon: Decimal::new(5, 1),
            nitrogen: Decimal::from(280),
            phosphorus: Decimal::from(22),
            potassium: Decimal::from(310),
        };
        assert!(validate_soil_health_card(&card).is_ok());
        card.ph = Decimal::from(15);
        assert_eq!(validate_soil_health_card(&card), Err("Soil pH must be between 0 and 14"));
        card.ph = Decimal::from(7);
        card.potassium = Decimal::from(-3);
        assert!(validate_soil_health_card(&card).is_err());
    }

    #[test]
    fn test_parse_image_data_uri() {
        let (mime, payload) = parse_image_data_uri("data:image/png;base64,iVBORw0KGgo=").unwrap();
        assert_eq!(mime, "image/png");
        assert_eq!(payload, "iVBORw0KGgo=");
        assert!(parse_image_data_uri("https://example.com/leaf.png").is_err());
        assert!(parse_image_data_uri("data:image/png,rawbytes").is_err());
        assert!(parse_image_data_uri("data:application/pdf;base64,JVBER").is_err());
        assert!(parse_image_data_uri("data:image/jpeg;base64,").is_err());
    }

    proptest! {
        #[test]
        fn prop_positive_sizes_are_valid(cents in 1i64..10_000_000) {
            prop_assert!(validate_farm_size(Decimal::new(cents, 2)).is_ok());
        }

        #[test]
        fn prop_normalized_phone_is_e164(digits in "[6-9][0-9]{9}") {
            let normalized = normalize_phone(&digits);
            prop_assert!(normalized.starts_with("+91"));
            prop_assert_eq!(normalized.len(), 13);
        }
    }
}
