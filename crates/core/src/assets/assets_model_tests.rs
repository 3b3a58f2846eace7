//! Tests for asset domain models.

#[cfg(test)]
mod tests {
    use crate::assets::{normalize_symbol, NewAsset};
    use crate::errors::Error;
    use crate::AssetError;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    #[test]
    fn test_normalize_symbol() {
        assert_eq!(normalize_symbol(" btc "), "BTC");
        assert_eq!(normalize_symbol("Eth"), "ETH");
    }

    #[test]
    fn test_new_asset_validation() {
        assert!(NewAsset::new("BTC", "Bitcoin", dec!(50000)).validate().is_ok());
        assert!(NewAsset::new("BTC", "Bitcoin", dec!(0)).validate().is_ok());

        let negative = NewAsset::new("BTC", "Bitcoin", dec!(-1)).validate();
        assert!(matches!(
            negative,
            Err(Error::Asset(AssetError::InvalidData(_)))
        ));

        assert!(NewAsset::new("  ", "Bitcoin", dec!(1)).validate().is_err());
        assert!(NewAsset::new("BTC", "", dec!(1)).validate().is_err());
    }

    #[test]
    fn test_into_asset_normalizes_and_stamps_time() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let asset = NewAsset::new("sol", " Solana ", dec!(150.25))
            .with_image_url("")
            .into_asset(now);

        assert_eq!(asset.symbol, "SOL");
        assert_eq!(asset.name, "Solana");
        assert_eq!(asset.current_price, dec!(150.25));
        assert_eq!(asset.image_url, None);
        assert_eq!(asset.last_updated, now);
    }

    #[test]
    fn test_into_asset_keeps_provider_timestamp() {
        let quoted = Utc.with_ymd_and_hms(2024, 5, 1, 11, 59, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let mut new_asset = NewAsset::new("ETH", "Ethereum", dec!(3000));
        new_asset.last_updated = Some(quoted);

        assert_eq!(new_asset.into_asset(now).last_updated, quoted);
    }

    #[test]
    fn test_asset_serializes_price_as_exact_string() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let asset = NewAsset::new("BTC", "Bitcoin", dec!(0.1)).into_asset(now);
        let json = serde_json::to_value(&asset).unwrap();
        assert_eq!(json["currentPrice"], "0.1");
        assert_eq!(json["symbol"], "BTC");
    }
}
