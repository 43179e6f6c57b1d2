// SPDX short identifier: Unlicense

use num_bigint::BigUint;

use ringsig::{
    common::*,
    scalar::to_hex
};

const CURVES: [Curve; 2] = [Curve::Secp256k1, Curve::Ed25519];

#[test]
fn group_law() {
    for curve in CURVES {
        let g = curve.generator_point().unwrap();
        let two_g = g.mult(&BigUint::from(2u32)).unwrap();
        let three_g = g.mult(&BigUint::from(3u32)).unwrap();

        assert_eq!(g.add(&g).unwrap(), two_g);
        assert_eq!(two_g.add(&g).unwrap(), three_g);
        assert!(curve.is_on_curve(three_g.x(), three_g.y()).unwrap());

        //(N + 1) * G = G
        assert_eq!(g.mult(&(curve.order() + 1u32)).unwrap(), g);
        //P + (-P) is the identity, which is not a valid point
        assert!(g.add(&g.negate().unwrap()).is_err());
        assert_eq!(three_g.add(&g.negate().unwrap()).unwrap(), two_g);

        //a * P + b * Q, with an identity sum reported as None
        let (one, two) = (BigUint::from(1u32), BigUint::from(2u32));
        assert_eq!(g.mult_add(&one, &two_g, &one).unwrap(), Some(three_g.clone()));
        assert_eq!(g.mult_add(&one, &g, &BigUint::from(0u32)).unwrap(), Some(g.clone()));
        assert_eq!(two_g.mult_add(&one, &g, &(curve.order() - 2u32)).unwrap(), None);
        assert_eq!(g.mult_add(&two, &two_g, &(curve.order() - 1u32)).unwrap(), None);
    }
}

#[test]
fn known_multiples() {
    //2G on secp256k1
    let two_g = Curve::Secp256k1.generator_point().unwrap().mult(&BigUint::from(2u32)).unwrap();
    assert_eq!(to_hex(two_g.x()), "c6047f9441ed7d6d3045406e95c07cd85c778e4b8cef3ca7abac09b95c709ee5");
    assert_eq!(to_hex(two_g.y()), "1ae168fea63dc339a3c58419466ceaeef7f632653266d0e1236431a950cfe52a");
}

#[test]
fn points_on_different_curves() {
    let a = Curve::Secp256k1.generator_point().unwrap();
    let b = Curve::Ed25519.generator_point().unwrap();
    assert_eq!(a.add(&b).unwrap_err(), SignatureError::CurveMismatch);
    assert!(!a.equals(&b));
}

#[test]
fn off_curve_points() {
    for curve in CURVES {
        let (gx, gy) = curve.generator();
        assert_eq!(
            Point::new(curve.clone(), gx.clone(), gy + 1u32).unwrap_err(),
            SignatureError::NotOnCurve
        );
        let bad = Point::new_unchecked(curve.clone(), gx.clone(), gy + 1u32);
        assert!(bad.mult(&BigUint::from(2u32)).is_err());
        //coordinates must be reduced
        assert!(Point::new(curve.clone(), gx + curve.field_prime(), gy.clone()).is_err());
    }
}

#[test]
fn low_order_points() {
    //identity and the point of order 2 on ed25519
    let identity = Point::new(Curve::Ed25519, BigUint::from(0u32), BigUint::from(1u32)).unwrap();
    assert!(matches!(identity.check_low_order(), Err(SignatureError::InvalidPoint(_))));

    let p = Curve::Ed25519.field_prime();
    let order_two = Point::new(Curve::Ed25519, BigUint::from(0u32), p - 1u32).unwrap();
    assert!(matches!(order_two.check_low_order(), Err(SignatureError::InvalidPoint(_))));

    //G plus a torsion point
    let g = Curve::Ed25519.generator_point().unwrap();
    let mixed = g.add(&order_two).unwrap();
    assert!(matches!(mixed.check_low_order(), Err(SignatureError::InvalidPoint(_))));

    g.check_low_order().unwrap();
    Curve::Secp256k1.generator_point().unwrap().check_low_order().unwrap();
}

#[test]
fn compression() {
    for curve in CURVES {
        let g = curve.generator_point().unwrap();
        for i in 1..10u32 {
            let point = g.mult(&BigUint::from(i * 7919)).unwrap();
            let compressed = point.compress().unwrap();
            assert_eq!(compressed.len(), COMPRESSED_POINT_LEN);
            assert_eq!(Point::decompress(&compressed).unwrap(), point);
            assert_eq!(Point::deserialize(&point.serialize().unwrap()).unwrap(), point);

            let negated = point.negate().unwrap();
            assert_ne!(negated.compress().unwrap(), compressed);
        }
    }

    let g = Curve::Secp256k1.generator_point().unwrap();
    assert_eq!(
        g.serialize().unwrap(),
        "010279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798"
    );

    let mut bad_tag = g.compress().unwrap();
    bad_tag[0] = 0x07;
    assert!(matches!(Point::decompress(&bad_tag), Err(SignatureError::UnknownCurve(_))));
    let mut bad_parity = g.compress().unwrap();
    bad_parity[1] = 0x04;
    assert!(Point::decompress(&bad_parity).is_err());
    assert!(Point::decompress(&bad_parity[..20]).is_err());
    assert!(Point::deserialize("not hex").is_err());
}

#[test]
fn display_round_trip() {
    for curve in CURVES {
        let point = curve.generator_point().unwrap().mult(&BigUint::from(12345u32)).unwrap();
        let encoded = point.to_string();
        assert_eq!(encoded.parse::<Point>().unwrap(), point);
    }

    assert_eq!("%%%".parse::<Point>().unwrap_err(), SignatureError::InvalidBase64);
    //base64 of "{}"
    assert!(matches!("e30=".parse::<Point>(), Err(SignatureError::InvalidJson(_))));
}

#[test]
fn curve_descriptions() {
    for curve in CURVES {
        assert_eq!(curve.to_string().parse::<Curve>().unwrap(), curve);
    }

    let custom = Curve::custom(
        BigUint::from(23u32), BigUint::from(7u32), BigUint::from(3u32), BigUint::from(10u32));
    assert_eq!(custom.to_string().parse::<Curve>().unwrap(), custom);
    assert!(matches!(custom.generator_point(), Err(SignatureError::UnsupportedCurve(_))));

    //a named curve with someone else's parameters
    let lying = Curve::Ed25519.to_string().replace("ED25519", "SECP256K1");
    assert_eq!(lying.parse::<Curve>().unwrap_err(), SignatureError::CurveMismatch);

    let unknown = Curve::Ed25519.to_string().replace("ED25519", "P256");
    assert!(matches!(unknown.parse::<Curve>(), Err(SignatureError::UnknownCurve(_))));
}
