// SPDX short identifier: Unlicense

use base64::{
    engine::general_purpose::STANDARD as BASE64,
    Engine as _
};
use serde_json::Value;

use ringsig::common::*;

fn signed(curve: &Curve, linkability_flag: Option<&str>) -> RingSignature {
    let mut ring: Vec<Point> = Vec::new();
    let mut keys = Vec::new();
    for _ in 0..4 {
        let key = curve.random_private_key().unwrap();
        ring.push(derive_public_key(&key, curve).unwrap());
        keys.push(key);
    }
    let ring = sort_ring(ring);
    let config = SignatureConfig::default();
    return match linkability_flag {
        Some(flag) => RingSignature::sign_linkable(&ring, &keys[0], "abcdef", curve, flag, &config).unwrap(),
        None => RingSignature::sign(&ring, &keys[0], "abcdef", curve, &config).unwrap()
    }
}

fn as_json(signature: &RingSignature) -> Value {
    return serde_json::from_str(&signature.to_json_string().unwrap()).unwrap()
}

#[test]
fn json_round_trip() {
    let config = SignatureConfig::default();
    for sig in [signed(&Curve::Secp256k1, None), signed(&Curve::Ed25519, None), signed(&Curve::Secp256k1, Some("flag"))] {
        let json = sig.to_json_string().unwrap();
        let decoded = RingSignature::from_json_string(&json).unwrap();
        assert_eq!(decoded, sig);
        assert!(decoded.verify(&config).unwrap());

        let encoded = sig.to_base64().unwrap();
        assert!(ringsig::is_base64(&encoded));
        assert_eq!(RingSignature::from_base64(&encoded).unwrap(), sig);
    }
}

#[test]
fn json_layout() {
    let sig = signed(&Curve::Secp256k1, None);
    let json = as_json(&sig);
    assert_eq!(json["message"], "abcdef");
    assert_eq!(json["ring"].as_array().unwrap().len(), 4);
    assert_eq!(json["responses"].as_array().unwrap().len(), 4);
    assert!(json["c"].as_str().unwrap().chars().all(|c| c.is_ascii_hexdigit()));
    assert!(!json["c"].as_str().unwrap().starts_with("0x"));
    assert_eq!(json["curve"].as_str().unwrap().parse::<Curve>().unwrap(), Curve::Secp256k1);
    //optional fields are left out
    assert!(json.get("keyImage").is_none());
    assert!(json.get("linkabilityFlag").is_none());

    let linkable = as_json(&signed(&Curve::Secp256k1, Some("")));
    assert_eq!(linkable["linkabilityFlag"], "");
    assert!(linkable["keyImage"].as_str().unwrap().parse::<Point>().is_ok());
}

#[test]
fn numeric_challenge() {
    let sig = signed(&Curve::Secp256k1, None);
    let mut json = as_json(&sig);
    json["c"] = serde_json::from_str("12345").unwrap();
    let decoded = RingSignature::from_json_string(&json.to_string()).unwrap();
    assert_eq!(decoded.c(), &num_bigint::BigUint::from(12345u32));
}

#[test]
fn decode_errors() {
    let sig = signed(&Curve::Secp256k1, Some("flag"));

    assert!(matches!(RingSignature::from_json_string("{not json"), Err(SignatureError::InvalidJson(_))));
    assert!(matches!(RingSignature::from_json_string("[1, 2]"), Err(SignatureError::InvalidJson(_))));

    let edit = |change: &dyn Fn(&mut Value)| {
        let mut json = as_json(&sig);
        change(&mut json);
        return RingSignature::from_json_string(&json.to_string())
    };

    //message must be a string
    assert!(matches!(edit(&|json| json["message"] = Value::from(5)), Err(SignatureError::InvalidParams(_))));
    //c must be a string or a number
    assert!(matches!(edit(&|json| json["c"] = Value::Bool(true)), Err(SignatureError::InvalidParams(_))));
    //c must be lower than N
    let n = Curve::Secp256k1.order().to_str_radix(16);
    assert!(matches!(edit(&|json| json["c"] = Value::from(n.clone())), Err(SignatureError::InvalidParams(_))));
    //missing field
    assert!(matches!(
        edit(&|json| { json.as_object_mut().unwrap().remove("responses"); }),
        Err(SignatureError::InvalidJson(_))
    ));
    //lengths
    assert_eq!(
        edit(&|json| { json["responses"].as_array_mut().unwrap().pop(); }).unwrap_err(),
        SignatureError::LengthMismatch
    );
    //hex digits only
    for c in ["0xff", "f_f", "+ff", " ff", ""] {
        assert!(matches!(edit(&|json| json["c"] = Value::from(c)), Err(SignatureError::InvalidParams(_))));
    }
    assert!(matches!(
        edit(&|json| json["responses"][0] = Value::from("0x1")),
        Err(SignatureError::InvalidParams(_))
    ));
    //responses in [1, N - 1]
    assert_eq!(edit(&|json| json["responses"][0] = Value::from("0")).unwrap_err(), SignatureError::InvalidResponses);
    //empty ring
    assert_eq!(
        edit(&|json| {
            json["ring"] = Value::Array(vec![]);
            json["responses"] = Value::Array(vec![]);
        }).unwrap_err(),
        SignatureError::EmptyRing
    );
    //duplicate member
    assert_eq!(
        edit(&|json| {
            let first = json["ring"][0].clone();
            json["ring"][1] = first;
        }).unwrap_err(),
        SignatureError::NoDuplicates
    );
    //unknown curve
    assert!(matches!(
        edit(&|json| json["curve"] = Value::from(r#"{"curve":"P256","Gx":"1","Gy":"2","N":"3","P":"5"}"#)),
        Err(SignatureError::UnknownCurve(_))
    ));
    //ring member on another curve
    let ed = derive_public_key(&Curve::Ed25519.random_private_key().unwrap(), &Curve::Ed25519).unwrap();
    assert_eq!(
        edit(&|json| json["ring"][2] = Value::from(ed.to_string())).unwrap_err(),
        SignatureError::CurveMismatch
    );
    //key image without its flag
    assert!(matches!(
        edit(&|json| { json.as_object_mut().unwrap().remove("linkabilityFlag"); }),
        Err(SignatureError::InvalidParams(_))
    ));
}

#[test]
fn base64_errors() {
    assert_eq!(RingSignature::from_base64("not base64!").unwrap_err(), SignatureError::InvalidBase64);
    assert_eq!(RingSignature::from_base64("YWJ").unwrap_err(), SignatureError::InvalidBase64);
    assert!(matches!(
        RingSignature::from_base64(&BASE64.encode("not json")),
        Err(SignatureError::InvalidJson(_))
    ));
}

#[test]
fn partial_round_trip() {
    let curve = Curve::Ed25519;
    let key = curve.random_private_key().unwrap();
    let public_key = derive_public_key(&key, &curve).unwrap();
    let config = SignatureConfig{ hash: HashFunction::Sha256, evm_compatibility: false };

    let partial = RingSignature::partial_sign(&[], &public_key, "abcdef", &curve, &config).unwrap();
    let decoded = PartialSignature::from_json_string(&partial.to_json_string().unwrap()).unwrap();
    assert_eq!(decoded, partial);
    assert_eq!(decoded.config(), &config);

    let response = decoded.signer_response(&key).unwrap();
    assert!(RingSignature::combine(&decoded, &response).unwrap().verify(&config).unwrap());

    assert!(matches!(PartialSignature::from_base64("@@@@"), Err(SignatureError::InvalidBase64)));
}
