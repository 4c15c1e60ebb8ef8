//! Unit tests for curves, key records and JWK projection

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};

use crate::keyring::{
    CurveType, EcKeyGenerator, JwkSet, KeyGenerator, KeyUse, SignatureAlgorithm,
};

#[test]
fn test_curve_algorithm_mapping() {
    assert_eq!(CurveType::P256.algorithm(), SignatureAlgorithm::ES256);
    assert_eq!(CurveType::P384.algorithm(), SignatureAlgorithm::ES384);
    assert_eq!(CurveType::P521.algorithm(), SignatureAlgorithm::ES512);
    assert!(SignatureAlgorithm::ES512.jwt_algorithm().is_none());
    assert_eq!(
        SignatureAlgorithm::ES384.jwt_algorithm(),
        Some(jsonwebtoken::Algorithm::ES384)
    );
}

#[test]
fn test_curve_parsing() {
    assert_eq!("P-256".parse::<CurveType>().unwrap(), CurveType::P256);
    assert_eq!("p384".parse::<CurveType>().unwrap(), CurveType::P384);
    assert_eq!(" P-521 ".parse::<CurveType>().unwrap(), CurveType::P521);

    let err = "secp256k1".parse::<CurveType>().unwrap_err();
    assert!(err.is_configuration());
}

#[test]
fn test_curve_serde_uses_jwk_names() {
    assert_eq!(serde_json::to_string(&CurveType::P384).unwrap(), "\"P-384\"");
    let parsed: CurveType = serde_json::from_str("\"P-521\"").unwrap();
    assert_eq!(parsed, CurveType::P521);
}

#[test]
fn test_generated_record_metadata() {
    let generator = EcKeyGenerator::new();

    for curve in CurveType::ALL {
        let record = generator.generate(curve).unwrap();
        assert_eq!(record.curve(), curve);
        assert_eq!(record.algorithm(), curve.algorithm());
        assert_eq!(record.key_use(), KeyUse::Sig);
        assert!(uuid::Uuid::parse_str(record.kid()).is_ok());

        let (x, y) = record.public_coordinates();
        assert_eq!(URL_SAFE_NO_PAD.decode(x).unwrap().len(), curve.coordinate_len());
        assert_eq!(URL_SAFE_NO_PAD.decode(y).unwrap().len(), curve.coordinate_len());
    }
}

#[test]
fn test_generated_key_ids_are_unique() {
    let generator = EcKeyGenerator::new();
    let a = generator.generate(CurveType::P256).unwrap();
    let b = generator.generate(CurveType::P256).unwrap();
    assert_ne!(a.kid(), b.kid());
}

#[test]
fn test_public_jwk_shape() {
    let record = EcKeyGenerator::new().generate(CurveType::P521).unwrap();
    let jwk = record.to_public_jwk();

    let value = serde_json::to_value(&jwk).unwrap();
    assert_eq!(value["kty"], "EC");
    assert_eq!(value["kid"], record.kid());
    assert_eq!(value["alg"], "ES512");
    assert_eq!(value["use"], "sig");
    assert_eq!(value["crv"], "P-521");
    assert!(value.get("d").is_none());
    assert!(!value["x"].as_str().unwrap().contains('='));
}

#[test]
fn test_private_jwk_extends_public() {
    let record = EcKeyGenerator::new().generate(CurveType::P256).unwrap();
    let private = record.to_private_jwk();

    assert_eq!(private.public, record.to_public_jwk());
    assert_eq!(URL_SAFE_NO_PAD.decode(&private.d).unwrap().len(), 32);

    let value = serde_json::to_value(&private).unwrap();
    assert_eq!(value["kid"], record.kid());
    assert!(value["d"].is_string());
}

#[test]
fn test_debug_output_hides_private_material() {
    let record = EcKeyGenerator::new().generate(CurveType::P384).unwrap();
    let private = record.to_private_jwk();

    let debug = format!("{:?}", record);
    assert!(debug.contains(record.kid()));
    assert!(!debug.contains(&private.d));

    let debug = format!("{:?}", private);
    assert!(debug.contains("<redacted>"));
    assert!(!debug.contains(&private.d));
}

#[test]
fn test_jwk_set_find() {
    let generator = EcKeyGenerator::new();
    let a = generator.generate(CurveType::P256).unwrap();
    let b = generator.generate(CurveType::P384).unwrap();

    let set = JwkSet::new(vec![a.to_public_jwk(), b.to_public_jwk()]);
    assert_eq!(set.len(), 2);
    assert_eq!(set.find(b.kid()).unwrap().crv, "P-384");
    assert!(set.find("missing").is_none());

    let json = serde_json::to_value(&set).unwrap();
    assert_eq!(json["keys"].as_array().unwrap().len(), 2);
}
